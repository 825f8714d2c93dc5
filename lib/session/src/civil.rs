//! Civil calendar arithmetic in a named timezone.
//!
//! Local date-times map to instants as follows:
//!
//! - a single valid offset gives that instant;
//! - in an overlap, the preferred offset wins if it is one of the two
//!   candidates, otherwise the earlier offset is used;
//! - in a gap, the local time is read with the offset in effect before the
//!   transition, which moves it later by the length of the gap.

use chrono::offset::LocalResult;
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

/// Transitions are never further apart than this.
const GAP_SEARCH_MINUTES: i64 = 24 * 60;

/// Maps a local date-time in `time_zone` to an instant.
#[must_use]
pub fn resolve_local(
    local: NaiveDateTime,
    time_zone: Tz,
    preferred: Option<FixedOffset>,
) -> DateTime<Utc> {
    match time_zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, second) => {
            let (earlier, later) = if first.offset().fix().local_minus_utc()
                >= second.offset().fix().local_minus_utc()
            {
                (first, second)
            } else {
                (second, first)
            };
            // The earlier offset is the larger one: it is in effect before
            // clocks are set back.
            match preferred {
                Some(p) if later.offset().fix() == p => later.with_timezone(&Utc),
                _ => earlier.with_timezone(&Utc),
            }
        }
        LocalResult::None => resolve_gap(local, time_zone),
    }
}

fn resolve_gap(local: NaiveDateTime, time_zone: Tz) -> DateTime<Utc> {
    let offset_before = (1..=GAP_SEARCH_MINUTES)
        .find_map(|minutes| {
            time_zone
                .from_local_datetime(&(local - Duration::minutes(minutes)))
                .latest()
        })
        .map_or_else(
            || time_zone.offset_from_utc_datetime(&local).fix(),
            |dt| dt.offset().fix(),
        );
    let utc = local - Duration::seconds(i64::from(offset_before.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}

/// Returns the civil start of the hour containing `instant`.
#[must_use]
pub fn start_of_hour(instant: DateTime<Utc>, time_zone: Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(&time_zone);
    let naive = local.naive_local();
    let into_hour = Duration::seconds(i64::from(naive.minute() * 60 + naive.second()))
        + Duration::nanoseconds(i64::from(naive.nanosecond()));
    resolve_local(naive - into_hour, time_zone, Some(local.offset().fix()))
}

/// Returns the civil start of the day containing `instant`.
#[must_use]
pub fn start_of_day(instant: DateTime<Utc>, time_zone: Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(&time_zone);
    let midnight = local.date_naive().and_time(NaiveTime::MIN);
    resolve_local(midnight, time_zone, Some(local.offset().fix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::Los_Angeles;

    fn naive(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .expect("valid date")
            .and_hms_opt(time.0, time.1, time.2)
            .expect("valid time")
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn single_mapping() {
        let instant = resolve_local(naive((2024, 7, 1), (9, 0, 0)), Los_Angeles, None);
        assert_eq!(instant, utc("2024-07-01T16:00:00Z"));
    }

    #[test]
    fn gap_moves_later() {
        let instant = resolve_local(naive((2024, 3, 10), (2, 30, 0)), Los_Angeles, None);
        assert_eq!(instant, utc("2024-03-10T10:30:00Z"));
    }

    #[test]
    fn overlap_prefers_earlier_offset() {
        let instant = resolve_local(naive((2024, 11, 3), (1, 30, 0)), Los_Angeles, None);
        // 01:30 PDT
        assert_eq!(instant, utc("2024-11-03T08:30:00Z"));
    }

    #[test]
    fn overlap_honors_preferred_offset() {
        let pst = FixedOffset::west_opt(8 * 3600).expect("offset");
        let instant = resolve_local(naive((2024, 11, 3), (1, 30, 0)), Los_Angeles, Some(pst));
        assert_eq!(instant, utc("2024-11-03T09:30:00Z"));
    }

    #[test]
    fn hour_start_keeps_the_second_pass_of_an_overlap() {
        // 01:45 PST, after clocks were set back.
        let truncated = start_of_hour(utc("2024-11-03T09:45:00Z"), Los_Angeles);
        assert_eq!(truncated, utc("2024-11-03T09:00:00Z"));
    }

    #[test]
    fn day_start_on_transition_days() {
        assert_eq!(
            start_of_day(utc("2024-03-10T20:00:00Z"), Los_Angeles),
            utc("2024-03-10T08:00:00Z")
        );
        assert_eq!(
            start_of_day(utc("2024-11-03T20:00:00Z"), Los_Angeles),
            utc("2024-11-03T07:00:00Z")
        );
    }
}
