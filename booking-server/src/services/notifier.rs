//! Notifier Service
//!
//! Emits booking facts for external collaborators (SMS/email senders,
//! dashboards). Delivery is not this core's concern: events go onto a
//! broadcast channel and into the log, and anyone interested subscribes.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::db::models::Reservation;

const CHANNEL_CAPACITY: usize = 256;

/// A booking fact worth telling the outside world about
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    Confirmed {
        reservation_id: String,
        table_number: i32,
        date: String,
        start_time: String,
        guests: i32,
        customer_id: String,
    },
    Cancelled {
        reservation_id: String,
        table_number: i32,
        date: String,
        start_time: String,
        customer_id: String,
        /// Whether the booking had been confirmed before cancellation;
        /// notifiers typically only message customers for these
        was_confirmed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct NotifierService {
    tx: broadcast::Sender<BookingEvent>,
}

impl NotifierService {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to booking events
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }

    pub fn reservation_confirmed(&self, reservation: &Reservation) {
        self.publish(BookingEvent::Confirmed {
            reservation_id: reservation.id_string(),
            table_number: reservation.table_number,
            date: reservation.date.clone(),
            start_time: reservation.start_time.clone(),
            guests: reservation.guests,
            customer_id: reservation.customer_id.clone(),
        });
    }

    pub fn reservation_cancelled(&self, reservation: &Reservation, was_confirmed: bool) {
        self.publish(BookingEvent::Cancelled {
            reservation_id: reservation.id_string(),
            table_number: reservation.table_number,
            date: reservation.date.clone(),
            start_time: reservation.start_time.clone(),
            customer_id: reservation.customer_id.clone(),
            was_confirmed,
        });
    }

    fn publish(&self, event: BookingEvent) {
        tracing::debug!(event = ?event, "Booking event");
        // No subscribers is fine; the log already carries the fact
        let _ = self.tx.send(event);
    }
}

impl Default for NotifierService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ReservationStatus;

    fn sample_reservation() -> Reservation {
        Reservation {
            id: None,
            table_id: "cafe_table:t5".into(),
            table_number: 5,
            customer_id: "A".into(),
            date: "2025-06-01".into(),
            start_time: "18:00".into(),
            start_minutes: 1080,
            duration_minutes: 90,
            guests: 4,
            status: ReservationStatus::Confirmed,
            lock_expires_at: None,
            special_requests: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_confirmed_facts() {
        let notifier = NotifierService::new();
        let mut rx = notifier.subscribe();

        notifier.reservation_confirmed(&sample_reservation());

        match rx.recv().await.unwrap() {
            BookingEvent::Confirmed {
                table_number,
                guests,
                ..
            } => {
                assert_eq!(table_number, 5);
                assert_eq!(guests, 4);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let notifier = NotifierService::new();
        notifier.reservation_cancelled(&sample_reservation(), true);
    }
}
