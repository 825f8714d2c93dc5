//! Building schedulers from workflow definitions.

use crate::error::ScheduleError;
use crate::schedule::{CronScheduler, Scheduler};
use almanac_workflow::WorkflowDefinition;
use chrono::Duration;
use tracing::debug;

/// Builds the [`Scheduler`] of a workflow definition.
pub trait SchedulerManager: Send + Sync {
    /// Returns the scheduler of `definition`, or `None` if it has no
    /// schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition has a schedule that cannot be
    /// built.
    fn try_get_scheduler(
        &self,
        definition: &WorkflowDefinition,
    ) -> Result<Option<Box<dyn Scheduler>>, ScheduleError>;
}

/// A [`SchedulerManager`] that builds [`CronScheduler`]s from `_schedule`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CronSchedulerManager;

impl CronSchedulerManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SchedulerManager for CronSchedulerManager {
    fn try_get_scheduler(
        &self,
        definition: &WorkflowDefinition,
    ) -> Result<Option<Box<dyn Scheduler>>, ScheduleError> {
        let Some(config) = definition.schedule() else {
            return Ok(None);
        };
        debug!(
            workflow_id = %definition.id,
            cron = %config.cron,
            delay = config.delay,
            "building cron scheduler"
        );
        let scheduler = CronScheduler::new(
            config.cron.clone(),
            definition.timezone,
            Duration::seconds(config.delay),
        )?;
        Ok(Some(Box::new(scheduler)))
    }
}
