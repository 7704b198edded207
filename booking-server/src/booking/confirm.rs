//! Confirmation Service
//!
//! Converts a valid, unexpired lock into a durable confirmed reservation.
//! The decisive step is the conditional write: the row must still be
//! locked, held by the caller, and unexpired at the moment of the update,
//! not merely at precondition-check time.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::clock::Clock;
use crate::db::models::{Reservation, ReservationStatus};
use crate::db::repository::ReservationRepository;
use crate::services::NotifierService;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ConfirmationService {
    reservations: ReservationRepository,
    clock: Arc<dyn Clock>,
    notifier: NotifierService,
}

impl ConfirmationService {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>, notifier: NotifierService) -> Self {
        Self {
            reservations: ReservationRepository::new(db),
            clock,
            notifier,
        }
    }

    /// Confirm a held reservation.
    ///
    /// Succeeds iff the row is `locked`, held by `customer_id`, and its TTL
    /// has not elapsed, all enforced by the conditional write. Exactly one
    /// caller can win for a given id; everyone else gets a typed failure
    /// reflecting the row's final state. Never a silent success.
    pub async fn confirm(
        &self,
        reservation_id: &str,
        customer_id: &str,
        special_requests: Option<String>,
    ) -> AppResult<Reservation> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Reservation {} not found", reservation_id))
            })?;

        if reservation.customer_id != customer_id {
            return Err(AppError::forbidden(
                "Only the lock holder may confirm this reservation",
            ));
        }

        let now = self.clock.now_millis();
        match reservation.status {
            ReservationStatus::Locked => {}
            ReservationStatus::Expired => {
                return Err(AppError::expired("Lock has expired, book again"));
            }
            status => {
                return Err(AppError::conflict(format!(
                    "Cannot confirm a {} reservation",
                    status
                )));
            }
        }

        if reservation.lock_overdue(now) {
            // Lazy physical expiry: same conditional primitive as the
            // reaper; a lost race here still means the lock is gone.
            self.reservations.expire_one(reservation_id, now).await?;
            return Err(AppError::expired("Lock has expired, book again"));
        }

        // Requests given at lock time survive a confirm that adds none
        let special_requests = special_requests.or_else(|| reservation.special_requests.clone());

        match self
            .reservations
            .confirm(reservation_id, customer_id, special_requests, now)
            .await?
        {
            Some(confirmed) => {
                tracing::info!(
                    reservation = %confirmed.id_string(),
                    table = confirmed.table_number,
                    "Reservation confirmed"
                );
                self.notifier.reservation_confirmed(&confirmed);
                Ok(confirmed)
            }
            // The condition lost between our precheck and the write;
            // re-read to report the row's actual resting state.
            None => match self.reservations.find_by_id(reservation_id).await? {
                None => Err(AppError::not_found(format!(
                    "Reservation {} not found",
                    reservation_id
                ))),
                Some(row) if row.status == ReservationStatus::Expired => {
                    Err(AppError::expired("Lock has expired, book again"))
                }
                Some(row) if row.lock_overdue(now) => {
                    self.reservations.expire_one(reservation_id, now).await?;
                    Err(AppError::expired("Lock has expired, book again"))
                }
                Some(row) => Err(AppError::conflict(format!(
                    "Cannot confirm a {} reservation",
                    row.status
                ))),
            },
        }
    }
}
