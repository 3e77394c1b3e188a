// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Parses a date string in any of the common human-readable formats
/// into `DateTime<Utc>`. Date-only formats map to midnight UTC.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    let s = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2024-03-01T08:30:00+01:00").unwrap();
        assert_eq!(dt.hour(), 7);
    }

    #[test]
    fn parses_plain_date_as_midnight() {
        let dt = parse_datetime("2024-03-01").unwrap();
        assert_eq!(dt.hour(), 0);
        let dotted = parse_datetime("01.03.2024").unwrap();
        assert_eq!(dotted, dt);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("not a date").is_none());
    }
}
