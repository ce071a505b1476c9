//! Parse platform timestamps into UTC.

use crate::utils::config::{DATE_FORMATS, NAIVE_DATETIME_FORMATS, OFFSET_DATETIME_FORMATS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a timestamp in any layout the platform exports use
///
/// Values without an offset are taken as UTC; bare dates become midnight.
/// Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            parse_timestamp("2024-01-05T10:30:00Z"),
            Some(utc(2024, 1, 5, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-05T12:30:00+02:00"),
            Some(utc(2024, 1, 5, 10, 30, 0))
        );
    }

    #[test]
    fn test_pandas_layouts() {
        assert_eq!(
            parse_timestamp("2024-09-04 12:34:56+00:00"),
            Some(utc(2024, 9, 4, 12, 34, 56))
        );
        assert_eq!(
            parse_timestamp("2024-09-04 12:34:56"),
            Some(utc(2024, 9, 4, 12, 34, 56))
        );
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(utc(2024, 1, 5, 0, 0, 0)));
        assert_eq!(parse_timestamp("01/05/2024"), Some(utc(2024, 1, 5, 0, 0, 0)));
        assert_eq!(parse_timestamp("02-06-23"), Some(utc(2023, 2, 6, 0, 0, 0)));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("last tuesday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }
}
