//! Reservation Model
//!
//! The central entity of the booking engine. A reservation is created in
//! `locked` state and settles into exactly one terminal outcome; old rows
//! are kept as history, never deleted.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Reservation lifecycle states.
///
/// Transitions: `locked → confirmed` (Confirm within TTL), `locked → expired`
/// (reaper or lazy read after TTL), `locked → cancelled` and
/// `confirmed → cancelled` (Cancel). `cancelled` and `expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Locked,
    Confirmed,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    /// Terminal states never leave once entered
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
///
/// The requested window is `[start, start + duration)`, half-open, compared
/// within a single calendar date. `start_time` is the display form of
/// `start_minutes`; both are written together and never diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Canonical `cafe_table:<key>` string of the booked table
    pub table_id: String,
    /// Denormalized table number for display and notifications
    pub table_number: i32,
    /// Holder identity, supplied by the Identity collaborator
    pub customer_id: String,
    /// ISO date `YYYY-MM-DD`
    pub date: String,
    /// Wall-clock start `HH:MM` (24h)
    pub start_time: String,
    /// Minutes from midnight; the query-side form of `start_time`
    pub start_minutes: i64,
    pub duration_minutes: i64,
    pub guests: i32,
    pub status: ReservationStatus,
    /// Unix millis; present only while `status == locked`
    #[serde(default)]
    pub lock_expires_at: Option<i64>,
    /// Opaque passthrough, stored at confirmation time
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl Reservation {
    /// Bare record key (the part after `reservation:`), empty for unsaved rows
    pub fn key(&self) -> String {
        self.id
            .as_ref()
            .map(|t| t.key().to_string())
            .unwrap_or_default()
    }

    /// Canonical `reservation:<key>` id string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// Exclusive window end in minutes from midnight (may pass 24:00)
    pub fn end_minutes(&self) -> i64 {
        self.start_minutes + self.duration_minutes
    }

    /// Whether the lock TTL has elapsed at `now_millis`.
    ///
    /// Only meaningful for `locked` rows; such a row no longer blocks its
    /// window even before the reaper physically transitions it.
    pub fn lock_overdue(&self, now_millis: i64) -> bool {
        self.status == ReservationStatus::Locked
            && self.lock_expires_at.is_some_and(|exp| exp <= now_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Locked).unwrap(),
            "\"locked\""
        );
        let status: ReservationStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, ReservationStatus::Expired);
    }

    #[test]
    fn terminal_states() {
        assert!(!ReservationStatus::Locked.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::Expired.is_terminal());
    }

    #[test]
    fn lock_overdue_only_applies_to_locked_rows() {
        let mut res = Reservation {
            id: None,
            table_id: "cafe_table:t5".into(),
            table_number: 5,
            customer_id: "A".into(),
            date: "2025-06-01".into(),
            start_time: "18:00".into(),
            start_minutes: 1080,
            duration_minutes: 90,
            guests: 4,
            status: ReservationStatus::Locked,
            lock_expires_at: Some(1_000),
            special_requests: None,
            created_at: 0,
            updated_at: 0,
        };

        assert!(res.lock_overdue(1_000));
        assert!(!res.lock_overdue(999));

        res.status = ReservationStatus::Confirmed;
        res.lock_expires_at = None;
        assert!(!res.lock_overdue(i64::MAX));
    }
}
