//! Requested session times.

use crate::civil;
use crate::error::TruncateError;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A session time as requested by a caller.
///
/// Either an absolute instant, or a local date-time that is read in the
/// workflow's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSessionTime {
    /// An instant, e.g. `2024-05-01T09:00:00+09:00`.
    Instant(DateTime<Utc>),
    /// A date-time without zone, e.g. `2024-05-01 09:00:00`.
    Local(NaiveDateTime),
}

impl RawSessionTime {
    /// Converts to an instant, reading local date-times in `time_zone`.
    #[must_use]
    pub fn to_instant(&self, time_zone: Tz) -> DateTime<Utc> {
        match self {
            Self::Instant(instant) => *instant,
            Self::Local(local) => civil::resolve_local(*local, time_zone, None),
        }
    }
}

impl From<DateTime<Utc>> for RawSessionTime {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<NaiveDateTime> for RawSessionTime {
    fn from(local: NaiveDateTime) -> Self {
        Self::Local(local)
    }
}

impl fmt::Display for RawSessionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::Local(local) => write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl FromStr for RawSessionTime {
    type Err = TruncateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Instant(instant.with_timezone(&Utc)));
        }
        LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(Self::Local)
            .ok_or_else(|| TruncateError::InvalidSessionTime {
                value: s.to_string(),
            })
    }
}
