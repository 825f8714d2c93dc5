//! Workflow lookup and session time operations.

use crate::error::ApiError;
use crate::types::{RestWorkflowDefinition, RestWorkflowSessionTime};
use almanac_core::{Result, SiteId, WorkflowDefinitionId};
use almanac_scheduler::SchedulerManager;
use almanac_session::{RawSessionTime, TruncationMode, truncate_session_time};
use almanac_workflow::DefinitionResolver;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The caller-facing workflow operations.
#[derive(Clone)]
pub struct WorkflowService {
    resolver: DefinitionResolver,
    schedulers: Arc<dyn SchedulerManager>,
}

impl WorkflowService {
    /// Creates a service.
    pub fn new(resolver: DefinitionResolver, schedulers: Arc<dyn SchedulerManager>) -> Self {
        Self {
            resolver,
            schedulers,
        }
    }

    /// Looks up a workflow by repository, optional revision and name.
    #[instrument(skip(self))]
    pub async fn get_workflow_by_name(
        &self,
        site_id: SiteId,
        repository: Option<&str>,
        revision: Option<&str>,
        name: Option<&str>,
    ) -> Result<RestWorkflowDefinition, ApiError> {
        let def = self
            .resolver
            .lookup_by_name(site_id, repository, revision, name)
            .await
            .map_err(ApiError::from)?;
        Ok(def.into())
    }

    /// Looks up a workflow by id.
    #[instrument(skip(self))]
    pub async fn get_workflow_by_id(
        &self,
        site_id: SiteId,
        workflow_id: WorkflowDefinitionId,
    ) -> Result<RestWorkflowDefinition, ApiError> {
        let def = self
            .resolver
            .lookup_by_id(site_id, workflow_id)
            .await
            .map_err(ApiError::from)?;
        Ok(def.into())
    }

    /// Computes the session time of a workflow for a requested time.
    ///
    /// `session_time` is an RFC 3339 instant or a local date-time read in the
    /// workflow's timezone. `mode` is a [`TruncationMode`] literal; without
    /// one the requested time is returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::InvalidArgument`] when `session_time` is missing
    /// or either argument is malformed, or when a schedule-based mode is
    /// requested for an unscheduled workflow.
    #[instrument(skip(self))]
    pub async fn get_truncated_session_time(
        &self,
        site_id: SiteId,
        workflow_id: WorkflowDefinitionId,
        session_time: Option<&str>,
        mode: Option<&str>,
    ) -> Result<RestWorkflowSessionTime, ApiError> {
        let raw = session_time
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::invalid_argument("session_time= is required"))?
            .parse::<RawSessionTime>()
            .map_err(ApiError::from)?;
        let mode = TruncationMode::parse_optional(mode).map_err(ApiError::from)?;

        let def = self
            .resolver
            .lookup_by_id(site_id, workflow_id)
            .await
            .map_err(ApiError::from)?;

        let truncated = truncate_session_time(&raw, def.time_zone(), mode, || {
            self.schedulers.try_get_scheduler(&def.definition)
        })
        .map_err(ApiError::from)?;
        debug!(%truncated, "computed session time");

        Ok(RestWorkflowSessionTime::new(&def, truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_scheduler::{CronSchedulerManager, ScheduleError, Scheduler};
    use almanac_workflow::{
        InMemoryRepositoryStore, NewWorkflowDefinition, ScheduleConfig, WorkflowDefinition,
    };
    use chrono_tz::{America::Los_Angeles, Asia::Tokyo};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Catalog {
        store: InMemoryRepositoryStore,
        unscheduled: WorkflowDefinitionId,
        scheduled: WorkflowDefinitionId,
        broken: WorkflowDefinitionId,
    }

    fn catalog() -> Catalog {
        let store = InMemoryRepositoryStore::new();
        let repo = store
            .create_repository(SiteId::new(0), "sales")
            .expect("repo");
        let rev = store.create_revision(repo.id, "rev1").expect("rev");
        let unscheduled = store
            .create_workflow_definition(rev.id, NewWorkflowDefinition::new("adhoc", Los_Angeles))
            .expect("workflow");
        let scheduled = store
            .create_workflow_definition(
                rev.id,
                NewWorkflowDefinition::new("daily_report", Tokyo)
                    .with_schedule(ScheduleConfig::new("0 0 9 * * *")),
            )
            .expect("workflow");
        let broken = store
            .create_workflow_definition(
                rev.id,
                NewWorkflowDefinition::new("broken", Tokyo)
                    .with_schedule(ScheduleConfig::new("at nine")),
            )
            .expect("workflow");
        Catalog {
            store,
            unscheduled: unscheduled.id,
            scheduled: scheduled.id,
            broken: broken.id,
        }
    }

    fn service_with(
        store: InMemoryRepositoryStore,
        schedulers: Arc<dyn SchedulerManager>,
    ) -> WorkflowService {
        WorkflowService::new(DefinitionResolver::new(Arc::new(store)), schedulers)
    }

    /// Counts how often a scheduler is requested.
    #[derive(Default)]
    struct CountingManager {
        calls: AtomicUsize,
    }

    impl SchedulerManager for CountingManager {
        fn try_get_scheduler(
            &self,
            definition: &WorkflowDefinition,
        ) -> std::result::Result<Option<Box<dyn Scheduler>>, ScheduleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CronSchedulerManager::new().try_get_scheduler(definition)
        }
    }

    #[tokio::test]
    async fn workflow_by_name_view() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));

        let view = service
            .get_workflow_by_name(SiteId::new(0), Some("sales"), None, Some("daily_report"))
            .await
            .expect("found");
        assert_eq!(view.id, catalog.scheduled);
        assert_eq!(view.project.name, "sales");
        assert_eq!(view.revision, "rev1");
        assert_eq!(view.timezone, Tokyo);
        assert!(view.schedule.is_some());
    }

    #[tokio::test]
    async fn hour_truncation_of_a_gap_local_time() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));

        let view = service
            .get_truncated_session_time(
                SiteId::new(0),
                catalog.unscheduled,
                Some("2024-03-10T02:30:00"),
                Some("hour"),
            )
            .await
            .expect("truncated");
        assert_eq!(view.session_time, "2024-03-10T03:00:00-07:00");
        assert_eq!(view.timezone, Los_Angeles);
    }

    #[tokio::test]
    async fn schedule_modes_use_the_workflow_schedule() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));
        let site = SiteId::new(0);

        let at_nine = service
            .get_truncated_session_time(
                site,
                catalog.scheduled,
                Some("2024-05-01T09:00:00"),
                Some("SCHEDULE"),
            )
            .await
            .expect("schedule");
        assert_eq!(at_nine.session_time, "2024-05-01T09:00:00+09:00");

        let next = service
            .get_truncated_session_time(
                site,
                catalog.scheduled,
                Some("2024-05-01T09:00:00"),
                Some("next_schedule"),
            )
            .await
            .expect("next schedule");
        assert_eq!(next.session_time, "2024-05-02T09:00:00+09:00");
    }

    #[tokio::test]
    async fn scheduler_is_not_built_for_calendar_modes() {
        let catalog = catalog();
        let manager = Arc::new(CountingManager::default());
        let service = service_with(catalog.store, manager.clone());

        for mode in [None, Some("none"), Some("hour"), Some("day")] {
            service
                .get_truncated_session_time(
                    SiteId::new(0),
                    catalog.scheduled,
                    Some("2024-05-01T10:15:00Z"),
                    mode,
                )
                .await
                .expect("truncated");
        }
        assert_eq!(manager.calls.load(Ordering::SeqCst), 0);

        service
            .get_truncated_session_time(
                SiteId::new(0),
                catalog.scheduled,
                Some("2024-05-01T10:15:00Z"),
                Some("schedule"),
            )
            .await
            .expect("truncated");
        assert_eq!(manager.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_arguments() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));
        let site = SiteId::new(0);

        let missing = service
            .get_truncated_session_time(site, catalog.unscheduled, None, Some("hour"))
            .await
            .unwrap_err();
        assert_eq!(
            missing.current_context(),
            &ApiError::invalid_argument("session_time= is required")
        );

        let bad_mode = service
            .get_truncated_session_time(
                site,
                catalog.unscheduled,
                Some("2024-05-01T00:00:00Z"),
                Some("week"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            bad_mode.current_context(),
            ApiError::InvalidArgument { .. }
        ));

        let unscheduled = service
            .get_truncated_session_time(
                site,
                catalog.unscheduled,
                Some("2024-05-01T00:00:00Z"),
                Some("schedule"),
            )
            .await
            .unwrap_err();
        assert_eq!(
            unscheduled.current_context(),
            &ApiError::invalid_argument(
                "session_time_truncate=SCHEDULE is set but _schedule is not set to this workflow"
            )
        );
    }

    #[tokio::test]
    async fn broken_schedule_is_a_collaborator_failure() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));

        let err = service
            .get_truncated_session_time(
                SiteId::new(0),
                catalog.broken,
                Some("2024-05-01T00:00:00Z"),
                Some("schedule"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ApiError::Collaborator { .. }
        ));
    }

    #[tokio::test]
    async fn other_sites_cannot_see_the_workflow() {
        let catalog = catalog();
        let service = service_with(catalog.store, Arc::new(CronSchedulerManager::new()));

        let err = service
            .get_workflow_by_id(SiteId::new(1), catalog.scheduled)
            .await
            .unwrap_err();
        assert!(matches!(err.current_context(), ApiError::NotFound { .. }));
    }
}
