//! Reservation Repository
//!
//! Owns the atomic conditional-write primitives the booking engine is built
//! on. Lock acquisition is a single transaction (conflict check + insert);
//! every later transition is a single `UPDATE ... WHERE` whose condition is
//! evaluated at write time by the store. Request handlers and the reaper
//! share these primitives and nothing else.
//!
//! The embedded engine validates transactions optimistically; an aborted
//! attempt was never applied, so every write here retries a few times on
//! serialization failures before giving up. Business conditions losing
//! (slot taken, row already settled) are never retried.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Reservation;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

const TABLE: &str = "reservation";

/// Marker thrown inside the lock transaction when the window is taken
const SLOT_TAKEN: &str = "slot_taken";

/// Attempts per conditional write before reporting engine contention
const TXN_ATTEMPTS: usize = 5;

/// Check-and-insert, linearized by the store. The `LET` subquery and the
/// `CREATE` run in one transaction, so two concurrent callers for the same
/// window cannot both observe "free".
const LOCK_SLOT_SQL: &str = "\
BEGIN TRANSACTION; \
LET $blocking = ( \
    SELECT VALUE id FROM reservation \
    WHERE table_id = $table_id \
      AND date = $date \
      AND start_minutes < $end_minutes \
      AND start_minutes + duration_minutes > $start_minutes \
      AND (status = 'confirmed' OR (status = 'locked' AND lock_expires_at > $now)) \
); \
IF array::len($blocking) > 0 { THROW 'slot_taken' }; \
CREATE type::thing('reservation', $key) CONTENT { \
    table_id: $table_id, \
    table_number: $table_number, \
    customer_id: $customer_id, \
    date: $date, \
    start_time: $start_time, \
    start_minutes: $start_minutes, \
    duration_minutes: $duration_minutes, \
    guests: $guests, \
    status: 'locked', \
    lock_expires_at: $expires_at, \
    special_requests: $special_requests, \
    created_at: $now, \
    updated_at: $now \
}; \
COMMIT TRANSACTION;";

/// Field set for a new lock row
#[derive(Debug, Clone)]
pub struct NewLock {
    /// Record key, generated by the caller (uuid v4)
    pub key: String,
    /// Canonical `cafe_table:<key>` string
    pub table_id: String,
    pub table_number: i32,
    pub customer_id: String,
    pub date: String,
    pub start_time: String,
    pub start_minutes: i64,
    pub duration_minutes: i64,
    pub guests: i32,
    pub lock_expires_at: i64,
    pub special_requests: Option<String>,
}

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically create a `locked` reservation, conditioned on no active
    /// overlapping reservation for the same table and date.
    ///
    /// Lazy expiry applies inside the condition: a `locked` row whose
    /// `lock_expires_at <= now` does not block, whether or not the reaper
    /// has transitioned it yet. Losing the race is a [`RepoError::Conflict`].
    pub async fn lock_slot(&self, lock: NewLock, now_millis: i64) -> RepoResult<Reservation> {
        for attempt in 1..=TXN_ATTEMPTS {
            let result = self
                .base
                .db()
                .query(LOCK_SLOT_SQL)
                .bind(("key", lock.key.clone()))
                .bind(("table_id", lock.table_id.clone()))
                .bind(("table_number", lock.table_number))
                .bind(("customer_id", lock.customer_id.clone()))
                .bind(("date", lock.date.clone()))
                .bind(("start_time", lock.start_time.clone()))
                .bind(("start_minutes", lock.start_minutes))
                .bind(("end_minutes", lock.start_minutes + lock.duration_minutes))
                .bind(("duration_minutes", lock.duration_minutes))
                .bind(("guests", lock.guests))
                .bind(("expires_at", lock.lock_expires_at))
                .bind(("special_requests", lock.special_requests.clone()))
                .bind(("now", now_millis))
                .await
                .and_then(|response| response.check());

            match result {
                Ok(_) => {
                    return self.find_by_id(&lock.key).await?.ok_or_else(|| {
                        RepoError::Database("Lock row missing after commit".to_string())
                    });
                }
                Err(err) => {
                    let msg = err.to_string();
                    if msg.contains(SLOT_TAKEN) {
                        return Err(RepoError::Conflict(format!(
                            "Table {} is no longer free for {} {}",
                            lock.table_number, lock.date, lock.start_time
                        )));
                    }
                    if is_retryable_txn_error(&msg) && attempt < TXN_ATTEMPTS {
                        tracing::debug!(attempt, "Lock transaction contended, retrying");
                        continue;
                    }
                    return Err(RepoError::Database(msg));
                }
            }
        }
        unreachable!("lock_slot attempt loop always returns")
    }

    /// Find reservation by id (bare key or `reservation:<key>`)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = parse_record_id(TABLE, id)?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// All reservations held by a customer, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation WHERE customer_id = $customer_id \
                 ORDER BY created_at DESC",
            )
            .bind(("customer_id", customer_id.to_string()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Table ids with a blocking reservation overlapping the window.
    ///
    /// Read-side lazy expiry: overdue locks are excluded here even though
    /// their rows still say `locked`, so a stale lock can never cause a
    /// false "no availability" result.
    pub async fn find_blocking_table_ids(
        &self,
        date: &str,
        start_minutes: i64,
        end_minutes: i64,
        now_millis: i64,
    ) -> RepoResult<Vec<String>> {
        let table_ids: Vec<String> = self
            .base
            .db()
            .query(
                "SELECT VALUE table_id FROM reservation \
                 WHERE date = $date \
                   AND start_minutes < $end_minutes \
                   AND start_minutes + duration_minutes > $start_minutes \
                   AND (status = 'confirmed' \
                        OR (status = 'locked' AND lock_expires_at > $now))",
            )
            .bind(("date", date.to_string()))
            .bind(("start_minutes", start_minutes))
            .bind(("end_minutes", end_minutes))
            .bind(("now", now_millis))
            .await?
            .take(0)?;
        Ok(table_ids)
    }

    /// Conditional transition `locked → confirmed`.
    ///
    /// The row must still be locked, held by `customer_id`, and unexpired at
    /// the moment of the write. Returns `None` when the condition lost;
    /// the caller re-reads the row to classify why.
    pub async fn confirm(
        &self,
        id: &str,
        customer_id: &str,
        special_requests: Option<String>,
        now_millis: i64,
    ) -> RepoResult<Option<Reservation>> {
        let thing = parse_record_id(TABLE, id)?;
        for attempt in 1..=TXN_ATTEMPTS {
            let result: Result<Option<Reservation>, surrealdb::Error> = async {
                self.base
                    .db()
                    .query(
                        "UPDATE $thing SET \
                           status = 'confirmed', \
                           lock_expires_at = NONE, \
                           special_requests = $special_requests, \
                           updated_at = $now \
                         WHERE status = 'locked' \
                           AND customer_id = $customer_id \
                           AND lock_expires_at > $now \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing.clone()))
                    .bind(("customer_id", customer_id.to_string()))
                    .bind(("special_requests", special_requests.clone()))
                    .bind(("now", now_millis))
                    .await?
                    .take(0)
            }
            .await;

            match result {
                Ok(updated) => return Ok(updated),
                Err(err) => {
                    let msg = err.to_string();
                    if is_retryable_txn_error(&msg) && attempt < TXN_ATTEMPTS {
                        continue;
                    }
                    return Err(RepoError::Database(msg));
                }
            }
        }
        unreachable!("confirm attempt loop always returns")
    }

    /// Conditional transition `{locked, confirmed} → cancelled`.
    ///
    /// Deliberately unconditioned by TTL: releasing a table early can never
    /// violate the no-double-booking invariant. Returns `None` when the row
    /// was already settled.
    pub async fn cancel(&self, id: &str, now_millis: i64) -> RepoResult<Option<Reservation>> {
        let thing = parse_record_id(TABLE, id)?;
        for attempt in 1..=TXN_ATTEMPTS {
            let result: Result<Option<Reservation>, surrealdb::Error> = async {
                self.base
                    .db()
                    .query(
                        "UPDATE $thing SET status = 'cancelled', updated_at = $now \
                         WHERE status IN ['locked', 'confirmed'] \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing.clone()))
                    .bind(("now", now_millis))
                    .await?
                    .take(0)
            }
            .await;

            match result {
                Ok(updated) => return Ok(updated),
                Err(err) => {
                    let msg = err.to_string();
                    if is_retryable_txn_error(&msg) && attempt < TXN_ATTEMPTS {
                        continue;
                    }
                    return Err(RepoError::Database(msg));
                }
            }
        }
        unreachable!("cancel attempt loop always returns")
    }

    /// Conditional transition `locked → expired` for one overdue row.
    ///
    /// Used for lazy physical expiry on the read paths. A `None` result
    /// means someone else settled the row first; that is not an error.
    pub async fn expire_one(&self, id: &str, now_millis: i64) -> RepoResult<Option<Reservation>> {
        let thing = parse_record_id(TABLE, id)?;
        for attempt in 1..=TXN_ATTEMPTS {
            let result: Result<Option<Reservation>, surrealdb::Error> = async {
                self.base
                    .db()
                    .query(
                        "UPDATE $thing SET status = 'expired', updated_at = $now \
                         WHERE status = 'locked' \
                           AND lock_expires_at != NONE \
                           AND lock_expires_at <= $now \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing.clone()))
                    .bind(("now", now_millis))
                    .await?
                    .take(0)
            }
            .await;

            match result {
                Ok(updated) => return Ok(updated),
                Err(err) => {
                    let msg = err.to_string();
                    if is_retryable_txn_error(&msg) && attempt < TXN_ATTEMPTS {
                        continue;
                    }
                    return Err(RepoError::Database(msg));
                }
            }
        }
        unreachable!("expire_one attempt loop always returns")
    }

    /// Bulk conditional transition `locked → expired` for every overdue row.
    ///
    /// The condition is re-evaluated per row at write time, so a concurrent
    /// Confirm that wins its race makes this a no-op for that row. Returns
    /// the transitioned rows.
    pub async fn expire_overdue(&self, now_millis: i64) -> RepoResult<Vec<Reservation>> {
        for attempt in 1..=TXN_ATTEMPTS {
            let result: Result<Vec<Reservation>, surrealdb::Error> = async {
                self.base
                    .db()
                    .query(
                        "UPDATE reservation SET status = 'expired', updated_at = $now \
                         WHERE status = 'locked' \
                           AND lock_expires_at != NONE \
                           AND lock_expires_at <= $now \
                         RETURN AFTER",
                    )
                    .bind(("now", now_millis))
                    .await?
                    .take(0)
            }
            .await;

            match result {
                Ok(expired) => return Ok(expired),
                Err(err) => {
                    let msg = err.to_string();
                    if is_retryable_txn_error(&msg) && attempt < TXN_ATTEMPTS {
                        continue;
                    }
                    return Err(RepoError::Database(msg));
                }
            }
        }
        unreachable!("expire_overdue attempt loop always returns")
    }
}

/// Engine serialization failures carry no business meaning; an aborted
/// attempt was never applied, so rerunning the write is safe.
fn is_retryable_txn_error(msg: &str) -> bool {
    msg.contains("read or write conflict") || msg.contains("can be retried")
}
