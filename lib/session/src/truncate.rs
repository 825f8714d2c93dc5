//! Session time truncation.

use crate::civil;
use crate::error::TruncateError;
use crate::mode::TruncationMode;
use crate::session_time::RawSessionTime;
use almanac_scheduler::{ScheduleError, Scheduler};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Computes the session time for a requested time and truncation mode.
///
/// `scheduler` is called at most once, and only for
/// [`TruncationMode::Schedule`] and [`TruncationMode::NextSchedule`].
///
/// # Errors
///
/// - [`TruncateError::ScheduleNotConfigured`] if a schedule-based mode is
///   requested and `scheduler` yields no scheduler.
/// - [`TruncateError::Scheduler`] if the scheduler cannot be built or has no
///   occurrence.
pub fn truncate_session_time<F>(
    raw: &RawSessionTime,
    time_zone: Tz,
    mode: Option<TruncationMode>,
    scheduler: F,
) -> Result<DateTime<Utc>, TruncateError>
where
    F: FnOnce() -> Result<Option<Box<dyn Scheduler>>, ScheduleError>,
{
    let instant = raw.to_instant(time_zone);
    let Some(mode) = mode else {
        return Ok(instant);
    };

    let truncated = match mode {
        TruncationMode::Hour => civil::start_of_hour(instant, time_zone),
        TruncationMode::Day => civil::start_of_day(instant, time_zone),
        TruncationMode::Schedule | TruncationMode::NextSchedule => {
            let scheduler = scheduler()?.ok_or(TruncateError::ScheduleNotConfigured { mode })?;
            let found = if mode == TruncationMode::Schedule {
                scheduler.first_schedule_time(instant)?
            } else {
                scheduler.next_schedule_time(instant)?
            };
            found.time
        }
    };
    debug!(%mode, %time_zone, from = %instant, to = %truncated, "truncated session time");
    Ok(truncated)
}
