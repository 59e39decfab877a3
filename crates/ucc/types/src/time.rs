//! Timestamp helpers.
//!
//! Timestamps are UTC instants kept at microsecond precision so that the
//! fixed fractional-seconds wire format round-trips exactly.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};

/// Wire format for all persisted timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current instant, truncated to microseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_round_trips_exactly() {
        let ts = now();
        let text = format_timestamp(&ts);
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn format_is_fixed_width_fraction() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T12:30:00.000000");
    }

    #[test]
    fn malformed_timestamp_is_error() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
