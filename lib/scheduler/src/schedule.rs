//! Cron-based occurrence search.

use crate::error::ScheduleError;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// One occurrence of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    /// The session instant of the occurrence.
    pub time: DateTime<Utc>,
    /// When the session is run: `time` plus the schedule's delay.
    pub run_time: DateTime<Utc>,
}

impl ScheduleTime {
    /// Creates an occurrence whose run time is `time + delay`.
    #[must_use]
    pub fn new(time: DateTime<Utc>, delay: Duration) -> Self {
        Self {
            time,
            run_time: time + delay,
        }
    }
}

/// Computes occurrences of a workflow's recurrence.
pub trait Scheduler: Send + Sync {
    /// Returns the first occurrence at or after `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule has no such occurrence.
    fn first_schedule_time(&self, time: DateTime<Utc>) -> Result<ScheduleTime, ScheduleError>;

    /// Returns the first occurrence strictly after `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule has no such occurrence.
    fn next_schedule_time(&self, time: DateTime<Utc>) -> Result<ScheduleTime, ScheduleError>;
}

/// A [`Scheduler`] backed by a cron expression evaluated in a timezone.
///
/// Expressions have a leading seconds field and an optional trailing year
/// field, e.g. `0 0 9 * * Mon-Fri`.
#[derive(Debug, Clone)]
pub struct CronScheduler {
    expression: String,
    schedule: cron::Schedule,
    time_zone: Tz,
    delay: Duration,
}

impl CronScheduler {
    /// Parses a cron expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid.
    pub fn new(
        expression: impl Into<String>,
        time_zone: Tz,
        delay: Duration,
    ) -> Result<Self, ScheduleError> {
        let expression = expression.into();
        let schedule = cron::Schedule::from_str(&expression).map_err(|e| {
            ScheduleError::InvalidCronExpression {
                expression: expression.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            expression,
            schedule,
            time_zone,
            delay,
        })
    }

    /// Returns the expression this scheduler was built from.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the timezone occurrences are evaluated in.
    #[must_use]
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    fn occurrence_after(&self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = time.with_timezone(&self.time_zone);
        self.schedule
            .after(&local)
            .next()
            .map(|t| t.with_timezone(&Utc))
    }

    fn exhausted(&self, after: DateTime<Utc>) -> ScheduleError {
        ScheduleError::Exhausted {
            expression: self.expression.clone(),
            after,
        }
    }
}

impl Scheduler for CronScheduler {
    fn first_schedule_time(&self, time: DateTime<Utc>) -> Result<ScheduleTime, ScheduleError> {
        // Occurrences fall on whole seconds, so searching from one second
        // earlier can land on an occurrence inside the fractional second
        // before `time`.
        let found = match self.occurrence_after(time - Duration::seconds(1)) {
            Some(candidate) if candidate >= time => Some(candidate),
            _ => self.occurrence_after(time),
        };
        found
            .map(|t| ScheduleTime::new(t, self.delay))
            .ok_or_else(|| self.exhausted(time))
    }

    fn next_schedule_time(&self, time: DateTime<Utc>) -> Result<ScheduleTime, ScheduleError> {
        self.occurrence_after(time)
            .map(|t| ScheduleTime::new(t, self.delay))
            .ok_or_else(|| self.exhausted(time))
    }
}
