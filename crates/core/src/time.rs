use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::{Result, TelemeterError};

/// Parses an ISO-8601 record timestamp into UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| TelemeterError::Parse(format!("invalid timestamp {input}: {e}")))
}

pub fn epoch_ms(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Truncates to the top of the hour (UTC).
pub fn start_of_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(ts.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&ts.date_naive().and_time(time))
}

/// Truncates to 00:00:00.000 (UTC).
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&ts.date_naive().and_time(NaiveTime::MIN))
}

/// Truncates to the 1st of the month at 00:00:00.000 (UTC).
pub fn start_of_month(ts: DateTime<Utc>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(ts.year(), ts.month(), 1).unwrap_or(ts.date_naive());
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let ts = parse_timestamp("2024-01-01T05:30:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T05:30:00+00:00");
    }

    #[test]
    fn parses_offset_timestamps_to_utc() {
        let ts = parse_timestamp("2024-01-01T05:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T03:30:00+00:00");
    }

    #[test]
    fn rejects_invalid() {
        assert!(parse_timestamp("not a time").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn truncates_to_hour() {
        let ts = parse_timestamp("2024-03-15T13:45:12.345Z").unwrap();
        assert_eq!(start_of_hour(ts).to_rfc3339(), "2024-03-15T13:00:00+00:00");
    }

    #[test]
    fn truncates_to_day_and_month() {
        let ts = parse_timestamp("2024-03-15T13:45:12Z").unwrap();
        assert_eq!(start_of_day(ts).to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert_eq!(start_of_month(ts).to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn boundary_instant_is_its_own_bucket_start() {
        let ts = parse_timestamp("2024-03-15T00:00:00Z").unwrap();
        assert_eq!(start_of_day(ts), ts);
        assert_eq!(start_of_hour(ts), ts);
    }
}
