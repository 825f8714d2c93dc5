//! Truncation modes.

use crate::error::TruncateError;
use std::fmt;
use std::str::FromStr;

/// How a requested session time is normalized.
///
/// Leaving the time as it is is expressed by the absence of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruncationMode {
    /// Start of the containing hour in the workflow's timezone.
    Hour,
    /// Start of the containing day in the workflow's timezone.
    Day,
    /// First scheduled occurrence at or after the time.
    Schedule,
    /// First scheduled occurrence strictly after the time.
    NextSchedule,
}

impl TruncationMode {
    /// Returns true if the mode consults the workflow's schedule.
    #[must_use]
    pub fn needs_schedule(self) -> bool {
        matches!(self, Self::Schedule | Self::NextSchedule)
    }

    /// Parses an optional mode literal.
    ///
    /// A missing or empty literal, or `none` in any case, means no truncation.
    ///
    /// # Errors
    ///
    /// Returns [`TruncateError::InvalidMode`] for unknown literals.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, TruncateError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) if v.eq_ignore_ascii_case("none") => Ok(None),
            Some(v) => v.parse().map(Some),
        }
    }
}

impl fmt::Display for TruncationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "HOUR"),
            Self::Day => write!(f, "DAY"),
            Self::Schedule => write!(f, "SCHEDULE"),
            Self::NextSchedule => write!(f, "NEXT_SCHEDULE"),
        }
    }
}

impl FromStr for TruncationMode {
    type Err = TruncateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "schedule" => Ok(Self::Schedule),
            "next_schedule" => Ok(Self::NextSchedule),
            _ => Err(TruncateError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("hour".parse::<TruncationMode>(), Ok(TruncationMode::Hour));
        assert_eq!("DAY".parse::<TruncationMode>(), Ok(TruncationMode::Day));
        assert_eq!(
            "Next_Schedule".parse::<TruncationMode>(),
            Ok(TruncationMode::NextSchedule)
        );
    }

    #[test]
    fn display_round_trips() {
        for mode in [
            TruncationMode::Hour,
            TruncationMode::Day,
            TruncationMode::Schedule,
            TruncationMode::NextSchedule,
        ] {
            assert_eq!(mode.to_string().parse::<TruncationMode>(), Ok(mode));
        }
    }

    #[test]
    fn none_means_no_truncation() {
        assert_eq!(TruncationMode::parse_optional(None), Ok(None));
        assert_eq!(TruncationMode::parse_optional(Some("none")), Ok(None));
        assert_eq!(TruncationMode::parse_optional(Some("NONE")), Ok(None));
        assert_eq!(TruncationMode::parse_optional(Some("")), Ok(None));
        assert_eq!(
            TruncationMode::parse_optional(Some("schedule")),
            Ok(Some(TruncationMode::Schedule))
        );
    }

    #[test]
    fn unknown_literal_is_invalid() {
        assert_eq!(
            TruncationMode::parse_optional(Some("week")),
            Err(TruncateError::InvalidMode {
                value: "week".to_string()
            })
        );
    }

    #[test]
    fn only_schedule_modes_need_a_schedule() {
        assert!(!TruncationMode::Hour.needs_schedule());
        assert!(!TruncationMode::Day.needs_schedule());
        assert!(TruncationMode::Schedule.needs_schedule());
        assert!(TruncationMode::NextSchedule.needs_schedule());
    }
}
