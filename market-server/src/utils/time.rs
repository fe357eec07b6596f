//! Time utilities — business-timezone conversion
//!
//! All date→timestamp conversion happens at the API handler layer;
//! repositories only receive `i64` Unix millis.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use shared::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Date + hour/minute/second → Unix millis (business timezone)
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) → Unix millis (business timezone)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// End of day (23:59:59) → Unix millis (business timezone)
///
/// Callers use inclusive `<= end` semantics.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 23, 59, 59, tz)
}

/// Today's date in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(parse_date("05/03/2024").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_day_bounds_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let start = day_start_millis(date, UTC);
        let end = day_end_millis(date, UTC);

        // 23h 59m 59s between the bounds
        assert_eq!(end - start, (24 * 3600 - 1) * 1000);
    }

    #[test]
    fn test_day_bounds_timezone_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let utc = day_start_millis(date, UTC);
        let madrid = day_start_millis(date, chrono_tz::Europe::Madrid);

        // Madrid (CET, UTC+1 in March before DST) starts its day earlier in
        // absolute time
        assert_eq!(utc - madrid, 3600 * 1000);
    }

    #[test]
    fn test_month_start() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(
            month_start(date),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        // already the first
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(month_start(first), first);
    }
}
