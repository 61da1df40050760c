//! Time helpers
//!
//! Date-range parameters arrive either as plain dates (`2024-05-01`) or as
//! RFC3339 datetimes. Plain dates expand to UTC day bounds; ranges are
//! inclusive on both ends.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Parse a `from` parameter: plain dates map to 00:00:00 UTC
pub fn parse_range_start(s: &str) -> Option<i64> {
    parse_param(s, false)
}

/// Parse a `to` parameter: plain dates map to 23:59:59.999 UTC
pub fn parse_range_end(s: &str) -> Option<i64> {
    parse_param(s, true)
}

fn parse_param(s: &str, end_of_day: bool) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(Utc.from_utc_datetime(&time).timestamp_millis())
}

/// Millis at the start of the current UTC day
pub fn start_of_today_millis() -> i64 {
    let now = Utc::now();
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap();
    Utc.from_utc_datetime(&midnight).timestamp_millis()
}

/// Millis at the start of the current UTC month
pub fn start_of_month_millis() -> i64 {
    let now = Utc::now();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Utc.from_utc_datetime(&first).timestamp_millis()
}

/// Format millis as `dd/mm/yyyy` for statements
pub fn format_date(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => "-".to_string(),
    }
}

/// Format millis as `yyyy-mm-dd` for filenames
pub fn format_date_iso(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_expand_to_day_bounds() {
        let start = parse_range_start("2024-05-01").unwrap();
        let end = parse_range_end("2024-05-01").unwrap();
        assert_eq!(end - start, 24 * 3600 * 1000 - 1);
    }

    #[test]
    fn rfc3339_passes_through() {
        let t = parse_range_start("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(format_date(t), "01/05/2024");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_range_start("yesterday").is_none());
        assert!(parse_range_end("01/05/2024").is_none());
    }
}
