//! Booking window
//!
//! A validated `(date, start, duration)` triple. The occupied interval is
//! `[start, start + duration)`, half-open, so back-to-back bookings like
//! 18:00–19:30 and 19:30–21:00 never collide. Windows are compared within
//! a single calendar date.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::utils::time::{
    date_time_to_utc, format_hhmm, minutes_from_midnight, parse_date, parse_hhmm,
};
use crate::utils::{AppError, AppResult};

/// Longest bookable window; keeps a window inside its calendar date's
/// comparison space
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// A validated reservation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration_minutes: i64,
}

impl BookingWindow {
    /// Parse and validate raw request fields.
    ///
    /// Rejects malformed dates/times and durations outside `(0, 24h]`
    /// before anything touches the store.
    pub fn parse(date: &str, start_time: &str, duration_minutes: i64) -> AppResult<Self> {
        let date = parse_date(date)?;
        let start = parse_hhmm(start_time)?;

        if duration_minutes <= 0 {
            return Err(AppError::validation(format!(
                "Duration must be positive, got {}",
                duration_minutes
            )));
        }
        if duration_minutes > MAX_DURATION_MINUTES {
            return Err(AppError::validation(format!(
                "Duration must not exceed {} minutes, got {}",
                MAX_DURATION_MINUTES, duration_minutes
            )));
        }

        Ok(Self {
            date,
            start,
            duration_minutes,
        })
    }

    /// Inclusive window start, minutes from midnight
    pub fn start_minutes(&self) -> i64 {
        minutes_from_midnight(self.start)
    }

    /// Exclusive window end, minutes from midnight (may pass 24:00)
    pub fn end_minutes(&self) -> i64 {
        self.start_minutes() + self.duration_minutes
    }

    /// The window's start as a UTC instant
    pub fn start_instant(&self) -> DateTime<Utc> {
        date_time_to_utc(self.date, self.start)
    }

    /// Policy: windows that already started cannot be booked
    pub fn ensure_not_past(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.start_instant() < now {
            return Err(AppError::validation(format!(
                "Requested window {} {} is in the past",
                self.date,
                self.start_time_string()
            )));
        }
        Ok(())
    }

    /// Half-open interval overlap against another window on the same date
    pub fn overlaps(&self, other_start_minutes: i64, other_end_minutes: i64) -> bool {
        self.start_minutes() < other_end_minutes && other_start_minutes < self.end_minutes()
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_time_string(&self) -> String {
        format_hhmm(self.start_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window(start_time: &str, duration: i64) -> BookingWindow {
        BookingWindow::parse("2025-06-01", start_time, duration).unwrap()
    }

    #[test]
    fn parses_and_formats() {
        let w = window("18:00", 90);
        assert_eq!(w.start_minutes(), 1080);
        assert_eq!(w.end_minutes(), 1170);
        assert_eq!(w.date_string(), "2025-06-01");
        assert_eq!(w.start_time_string(), "18:00");
    }

    #[test]
    fn rejects_bad_duration() {
        assert!(BookingWindow::parse("2025-06-01", "18:00", 0).is_err());
        assert!(BookingWindow::parse("2025-06-01", "18:00", -30).is_err());
        assert!(BookingWindow::parse("2025-06-01", "18:00", 24 * 60 + 1).is_err());
        assert!(BookingWindow::parse("2025-06-01", "18:00", 24 * 60).is_ok());
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(BookingWindow::parse("June 1st", "18:00", 90).is_err());
        assert!(BookingWindow::parse("2025-06-01", "6pm", 90).is_err());
    }

    #[test]
    fn half_open_overlap() {
        let w = window("18:00", 90); // [1080, 1170)

        // identical and partial overlaps
        assert!(w.overlaps(1080, 1170));
        assert!(w.overlaps(1100, 1200));
        assert!(w.overlaps(1000, 1081));
        // containment both ways
        assert!(w.overlaps(1090, 1100));
        assert!(w.overlaps(900, 1400));
        // back-to-back never collides
        assert!(!w.overlaps(1170, 1260));
        assert!(!w.overlaps(990, 1080));
        // disjoint
        assert!(!w.overlaps(600, 700));
    }

    #[test]
    fn past_window_policy() {
        let w = window("18:00", 90);
        let before = Utc.with_ymd_and_hms(2025, 6, 1, 17, 59, 0).unwrap();
        let exactly = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 6, 1, 18, 1, 0).unwrap();

        assert!(w.ensure_not_past(before).is_ok());
        assert!(w.ensure_not_past(exactly).is_ok());
        assert!(w.ensure_not_past(after).is_err());
    }
}
