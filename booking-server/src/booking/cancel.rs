//! Cancellation Service
//!
//! Releases a table immediately from `locked` or `confirmed` state. The
//! transition is unconditioned by TTL (releasing early can never cause a
//! double booking), but a second cancel of the same reservation is
//! rejected, so callers can tell "I cancelled it" from "it was already
//! gone".

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::clock::Clock;
use crate::db::models::{Reservation, ReservationStatus};
use crate::db::repository::ReservationRepository;
use crate::services::NotifierService;
use crate::utils::{AppError, AppResult};

/// Who is asking. The staff flag is an authorization fact established by
/// the Identity collaborator, not computed here.
#[derive(Debug, Clone)]
pub struct Requester {
    pub customer_id: String,
    pub staff: bool,
}

#[derive(Clone)]
pub struct CancellationService {
    reservations: ReservationRepository,
    clock: Arc<dyn Clock>,
    notifier: NotifierService,
}

impl CancellationService {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>, notifier: NotifierService) -> Self {
        Self {
            reservations: ReservationRepository::new(db),
            clock,
            notifier,
        }
    }

    /// Cancel a held or confirmed reservation.
    ///
    /// Holder or staff only. Concurrent cancel/confirm/expire attempts on
    /// the same row are linearized by the conditional update; exactly one
    /// wins and the rest see the row's final state in their error.
    pub async fn cancel(&self, reservation_id: &str, requester: Requester) -> AppResult<Reservation> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Reservation {} not found", reservation_id))
            })?;

        if !requester.staff && reservation.customer_id != requester.customer_id {
            return Err(AppError::forbidden(
                "Only the holder or staff may cancel this reservation",
            ));
        }

        if reservation.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Reservation is already {}",
                reservation.status
            )));
        }

        let was_confirmed = reservation.status == ReservationStatus::Confirmed;
        match self
            .reservations
            .cancel(reservation_id, self.clock.now_millis())
            .await?
        {
            Some(cancelled) => {
                tracing::info!(
                    reservation = %cancelled.id_string(),
                    table = cancelled.table_number,
                    was_confirmed,
                    "Reservation cancelled"
                );
                self.notifier.reservation_cancelled(&cancelled, was_confirmed);
                Ok(cancelled)
            }
            // Someone settled the row between precheck and write
            None => match self.reservations.find_by_id(reservation_id).await? {
                None => Err(AppError::not_found(format!(
                    "Reservation {} not found",
                    reservation_id
                ))),
                Some(row) => Err(AppError::conflict(format!(
                    "Reservation is already {}",
                    row.status
                ))),
            },
        }
    }
}
