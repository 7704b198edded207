//! Availability Index
//!
//! Read-side query answering "which tables are free for this window and
//! party size". Pure query, no side effects: even overdue locks are only
//! *treated* as free here; the reaper does the physical transition.

use std::collections::HashSet;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::clock::Clock;
use crate::booking::window::BookingWindow;
use crate::db::models::CafeTable;
use crate::db::repository::{ReservationRepository, TableRepository};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct AvailabilityService {
    tables: TableRepository,
    reservations: ReservationRepository,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: TableRepository::new(db.clone()),
            reservations: ReservationRepository::new(db),
            clock,
        }
    }

    /// Tables free for the window, in table-number order.
    ///
    /// A table is free when no reservation on it for the same date overlaps
    /// the half-open window in status `confirmed`, or `locked` with an
    /// unexpired TTL. Overdue locks never block (lazy expiry).
    pub async fn find_available(
        &self,
        date: &str,
        start_time: &str,
        duration_minutes: i64,
        guests: i32,
    ) -> AppResult<Vec<CafeTable>> {
        if guests < 1 {
            return Err(AppError::validation(format!(
                "Party size must be at least 1, got {}",
                guests
            )));
        }

        let window = BookingWindow::parse(date, start_time, duration_minutes)?;
        window.ensure_not_past(self.clock.now())?;

        let candidates = self.tables.find_seatable(guests).await?;
        if candidates.is_empty() {
            return Err(AppError::validation(format!(
                "No table can seat a party of {}",
                guests
            )));
        }

        let blocked: HashSet<String> = self
            .reservations
            .find_blocking_table_ids(
                &window.date_string(),
                window.start_minutes(),
                window.end_minutes(),
                self.clock.now_millis(),
            )
            .await?
            .into_iter()
            .collect();

        Ok(candidates
            .into_iter()
            .filter(|table| !blocked.contains(&table.id_string()))
            .collect())
    }
}
