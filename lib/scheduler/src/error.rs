//! Error types for the scheduler crate.

use chrono::{DateTime, Utc};
use std::fmt;

/// Errors from building or querying a scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The cron expression could not be parsed.
    InvalidCronExpression { expression: String, reason: String },
    /// The schedule has no occurrence at or after the requested instant.
    Exhausted {
        expression: String,
        after: DateTime<Utc>,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCronExpression { expression, reason } => {
                write!(f, "invalid cron expression '{expression}': {reason}")
            }
            Self::Exhausted { expression, after } => {
                write!(
                    f,
                    "schedule '{expression}' has no occurrence after {}",
                    after.to_rfc3339()
                )
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
