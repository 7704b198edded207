//! Expiry Reaper
//!
//! Periodic background sweep that physically transitions overdue locks to
//! `expired`. It shares exactly one thing with the request handlers: the
//! store's conditional update. If a Confirm wins the race for a row, the
//! sweep's write is a no-op for it; if the sweep wins, the Confirm fails
//! with an expired error. Never both.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::booking::clock::Clock;
use crate::db::repository::ReservationRepository;
use crate::utils::AppResult;

pub struct ExpiryReaper {
    reservations: ReservationRepository,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl ExpiryReaper {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>, interval_secs: u64) -> Self {
        Self {
            reservations: ReservationRepository::new(db),
            clock,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// One sweep: expire every `locked` row whose TTL has elapsed.
    ///
    /// Each row's condition is evaluated by the store at write time, so
    /// confirmed and cancelled rows are untouched no matter how the sweep
    /// interleaves with request handling. Returns the number of rows
    /// transitioned.
    pub async fn sweep(&self) -> AppResult<usize> {
        let expired = self
            .reservations
            .expire_overdue(self.clock.now_millis())
            .await?;

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Released expired table locks");
            for reservation in &expired {
                tracing::debug!(
                    reservation = %reservation.id_string(),
                    table = reservation.table_number,
                    date = %reservation.date,
                    start = %reservation.start_time,
                    "Lock expired"
                );
            }
        }
        Ok(expired.len())
    }

    /// Run sweeps on the configured interval until shutdown.
    ///
    /// A failed sweep is logged and retried on the next tick; it must never
    /// take the process down or block request handling.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::debug!(interval_secs = self.interval.as_secs(), "Expiry reaper started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Expiry reaper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep().await {
                        tracing::warn!(error = %err, "Expiry sweep failed, will retry next tick");
                    }
                }
            }
        }
    }
}
