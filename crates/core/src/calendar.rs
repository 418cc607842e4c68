//! Calendar dates as stored on assignment records.
//!
//! Assignment dates are day/month/year strings written by the browser
//! (`15/01/2023`). They are compared as calendar dates, never lexically, and
//! a string that cannot be parsed yields `None` instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format used when the ledger writes a new start/end date.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a stored date string.
///
/// Accepts `d/m/yyyy`, ISO `yyyy-mm-dd`, RFC 3339 and naive ISO timestamps.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 3 {
        let day: u32 = parts[0].trim().parse().ok()?;
        let month: u32 = parts[1].trim().parse().ok()?;
        let year: i32 = parts[2].trim().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|ts| ts.date())
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 plus the naive `yyyy-mm-ddTHH:MM[:SS]` forms produced by
/// browser date inputs, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.and_utc())
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole calendar days between two dates, order-insensitive.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(parse_calendar_date("15/01/2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_calendar_date("5/3/2024"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn day_month_year_is_not_compared_lexically() {
        let a = parse_calendar_date("02/01/2024").unwrap();
        let b = parse_calendar_date("31/12/2023").unwrap();
        assert!(a > b);
    }

    #[test]
    fn parses_iso_forms() {
        assert_eq!(parse_calendar_date("2023-10-12"), Some(ymd(2023, 10, 12)));
        assert_eq!(
            parse_calendar_date("2023-01-01T08:00:00"),
            Some(ymd(2023, 1, 1))
        );
        assert_eq!(
            parse_calendar_date("2023-01-01T08:00:00Z"),
            Some(ymd(2023, 1, 1))
        );
    }

    #[test]
    fn malformed_dates_are_none() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("31/02/2023"), None);
        assert_eq!(parse_calendar_date("aa/bb/cccc"), None);
    }

    #[test]
    fn parses_browser_timestamps() {
        let ts = parse_timestamp("2023-10-10T09:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-10T09:30:00+00:00");
        assert!(parse_timestamp("2023-10-10T09:30:00.000Z").is_some());
        assert!(parse_timestamp("2023-10-10T09:30:15").is_some());
        assert!(parse_timestamp("not a time").is_none());
    }

    #[test]
    fn formats_day_first() {
        assert_eq!(format_calendar_date(ymd(2024, 3, 5)), "05/03/2024");
    }

    #[test]
    fn days_between_ignores_order() {
        assert_eq!(days_between(ymd(2023, 1, 1), ymd(2023, 1, 15)), 14);
        assert_eq!(days_between(ymd(2023, 1, 15), ymd(2023, 1, 1)), 14);
    }
}
