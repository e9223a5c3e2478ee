// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and local calendar days.

use crate::error::EngineError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Largest accepted UTC offset (UTC+14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Calendar years accepted from clients.
pub const EARLIEST_YEAR: i32 = 1970;
pub const LATEST_YEAR: i32 = 9999;

/// Allowed clock skew for client timestamps in the future.
pub const MAX_FUTURE_SKEW_MINUTES: i64 = 5;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar day of `ts` for a user `offset_minutes` ahead of UTC.
///
/// Instants at the edge of the representable range keep their UTC day.
pub fn local_date(ts: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    ts.checked_add_signed(Duration::minutes(offset_minutes as i64))
        .unwrap_or(ts)
        .date_naive()
}

/// UTC instant at which local calendar day `date` begins.
pub fn local_day_start_utc(date: NaiveDate, offset_minutes: i32) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    midnight
        .checked_sub_signed(Duration::minutes(offset_minutes as i64))
        .unwrap_or(midnight)
}

fn year_in_range(year: i32) -> bool {
    (EARLIEST_YEAR..=LATEST_YEAR).contains(&year)
}

/// Parse a `YYYY-MM-DD` query parameter within the accepted years.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| year_in_range(date.year()))
}

/// Check a client-supplied event time: not before 1970 and at most a few
/// minutes ahead of `now`.
pub fn check_event_time(
    field: &str,
    ts: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, EngineError> {
    if !year_in_range(ts.year()) {
        return Err(EngineError::InvalidInput(format!(
            "{} must be between {} and {}",
            field, EARLIEST_YEAR, LATEST_YEAR
        )));
    }
    if ts > now + Duration::minutes(MAX_FUTURE_SKEW_MINUTES) {
        return Err(EngineError::InvalidInput(format!("{} is in the future", field)));
    }
    Ok(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(local_date(ts, 0), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(local_date(ts, 60), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(
            local_date(ts, -24 * 60),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_local_day_start_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(
            local_day_start_utc(date, 120),
            Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap()
        );
        assert_eq!(local_date(local_day_start_utc(date, 120), 120), date);
    }

    #[test]
    fn test_extreme_instants_do_not_overflow() {
        let earliest = DateTime::<Utc>::MIN_UTC;
        assert_eq!(local_date(earliest, -60), earliest.date_naive());

        let last_day = NaiveDate::MAX;
        assert_eq!(
            local_day_start_utc(last_day, -MAX_UTC_OFFSET_MINUTES).date_naive(),
            last_day
        );
    }

    #[test]
    fn test_parse_date_rejects_out_of_range_years() {
        assert_eq!(
            parse_date("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert!(parse_date("9999-12-31").is_some());
        assert!(parse_date("+262142-12-31").is_none());
        assert!(parse_date("1969-12-31").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }

    #[test]
    fn test_check_event_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();

        assert!(check_event_time("performed_at", now - Duration::days(400), now).is_ok());
        assert!(check_event_time("performed_at", now + Duration::minutes(4), now).is_ok());
        assert!(check_event_time("performed_at", now + Duration::hours(1), now).is_err());

        let ancient = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap();
        assert!(matches!(
            check_event_time("eaten_at", ancient, now),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(check_event_time("eaten_at", DateTime::<Utc>::MIN_UTC, now).is_err());
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(ts), "2024-01-15T10:30:00Z");
    }
}
