//! Lock Manager
//!
//! Creates short-lived holds on a table for a window. The availability
//! check and the insert are one store transaction; two callers racing for
//! the same slot are linearized there, and the loser gets a Conflict with
//! no queuing or waiting.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::booking::LOCK_TTL_MINUTES;
use crate::booking::clock::Clock;
use crate::booking::window::BookingWindow;
use crate::db::models::Reservation;
use crate::db::repository::reservation::NewLock;
use crate::db::repository::{ReservationRepository, TableRepository};
use crate::utils::{AppError, AppResult};

/// Lock request fields, identity included (supplied by the Auth collaborator)
#[derive(Debug, Clone)]
pub struct LockRequest {
    pub table_id: String,
    pub date: String,
    pub start_time: String,
    pub duration_minutes: i64,
    pub guests: i32,
    pub customer_id: String,
    pub special_requests: Option<String>,
}

#[derive(Clone)]
pub struct LockService {
    tables: TableRepository,
    reservations: ReservationRepository,
    clock: Arc<dyn Clock>,
}

impl LockService {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: TableRepository::new(db.clone()),
            reservations: ReservationRepository::new(db),
            clock,
        }
    }

    /// Acquire a 5-minute hold on a table for the requested window.
    ///
    /// Validation happens before any store write; the hold itself is the
    /// repository's atomic check-and-insert. Returns the new reservation,
    /// `lock_expires_at` set, so the caller can display a countdown.
    pub async fn lock(&self, request: LockRequest) -> AppResult<Reservation> {
        if request.guests < 1 {
            return Err(AppError::validation(format!(
                "Party size must be at least 1, got {}",
                request.guests
            )));
        }
        if request.customer_id.trim().is_empty() {
            return Err(AppError::validation("Customer id must not be empty"));
        }

        let window =
            BookingWindow::parse(&request.date, &request.start_time, request.duration_minutes)?;
        window.ensure_not_past(self.clock.now())?;

        let table = self
            .tables
            .find_by_id(&request.table_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {} not found", request.table_id)))?;

        if !table.is_active {
            return Err(AppError::validation(format!(
                "Table {} is not accepting reservations",
                table.number
            )));
        }
        if table.capacity < request.guests {
            return Err(AppError::validation(format!(
                "Table capacity ({}) is less than requested guests ({})",
                table.capacity, request.guests
            )));
        }

        let now = self.clock.now_millis();
        let lock = NewLock {
            key: Uuid::new_v4().simple().to_string(),
            table_id: table.id_string(),
            table_number: table.number,
            customer_id: request.customer_id,
            date: window.date_string(),
            start_time: window.start_time_string(),
            start_minutes: window.start_minutes(),
            duration_minutes: window.duration_minutes,
            guests: request.guests,
            lock_expires_at: now + LOCK_TTL_MINUTES * 60 * 1000,
            special_requests: request.special_requests,
        };

        let reservation = self.reservations.lock_slot(lock, now).await?;
        tracing::info!(
            reservation = %reservation.id_string(),
            table = reservation.table_number,
            date = %reservation.date,
            start = %reservation.start_time,
            "Table locked"
        );
        Ok(reservation)
    }
}
