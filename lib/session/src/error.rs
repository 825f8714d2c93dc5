//! Error types for session time handling.

use crate::mode::TruncationMode;
use almanac_scheduler::ScheduleError;
use std::fmt;

/// Errors from parsing or truncating a session time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruncateError {
    /// The session time is neither an instant nor a local date-time.
    InvalidSessionTime { value: String },
    /// The truncation mode literal is unknown.
    InvalidMode { value: String },
    /// A schedule-based mode was requested for an unscheduled workflow.
    ScheduleNotConfigured { mode: TruncationMode },
    /// The workflow's scheduler could not be built or queried.
    Scheduler(ScheduleError),
}

impl TruncateError {
    /// Returns true if the caller supplied a bad argument, as opposed to a
    /// scheduler failure.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::Scheduler(_))
    }
}

impl fmt::Display for TruncateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSessionTime { value } => write!(
                f,
                "invalid session_time '{value}': expected an RFC 3339 instant or a local date-time"
            ),
            Self::InvalidMode { value } => write!(f, "unknown truncation mode: {value}"),
            Self::ScheduleNotConfigured { mode } => write!(
                f,
                "session_time_truncate={mode} is set but _schedule is not set to this workflow"
            ),
            Self::Scheduler(err) => write!(f, "scheduler failed: {err}"),
        }
    }
}

impl std::error::Error for TruncateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scheduler(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScheduleError> for TruncateError {
    fn from(err: ScheduleError) -> Self {
        Self::Scheduler(err)
    }
}
