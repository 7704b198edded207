//! Time helpers
//!
//! All date/time parsing happens at the edges (handlers, booking services);
//! the repository layer only ever sees `i64` Unix millis and minute offsets.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::{AppError, AppResult};

/// Parse a calendar date string (`YYYY-MM-DD`)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a 24h wall-clock time string (`HH:MM`)
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// Minutes from midnight for a wall-clock time
pub fn minutes_from_midnight(time: NaiveTime) -> i64 {
    use chrono::Timelike;
    (time.hour() * 60 + time.minute()) as i64
}

/// Format a minute offset back to `HH:MM`
pub fn format_hhmm(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Date + wall-clock time as a UTC instant
pub fn date_time_to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date_and_time() {
        let date = parse_date("2025-06-01").unwrap();
        assert_eq!(date.to_string(), "2025-06-01");

        let time = parse_hhmm("18:00").unwrap();
        assert_eq!(minutes_from_midnight(time), 18 * 60);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_date("01-06-2025").is_err());
        assert!(parse_date("2025-13-40").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("18h00").is_err());
    }

    #[test]
    fn round_trips_minute_offsets() {
        let time = parse_hhmm("09:05").unwrap();
        assert_eq!(format_hhmm(minutes_from_midnight(time)), "09:05");
    }
}
