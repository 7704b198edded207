//! Repository Module
//!
//! All SurrealDB access for the booking engine. Every reservation state
//! transition exposed here is a single conditioned write against the store;
//! there is no read-then-write pair anywhere in this layer.

pub mod cafe_table;
pub mod reservation;

pub use cafe_table::TableRepository;
pub use reservation::ReservationRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conditional write lost its race (slot taken, row already settled)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a caller-supplied id into a RecordId for `table`.
///
/// Accepts both the bare key (`"t5"`) and the canonical form
/// (`"cafe_table:t5"`); a canonical form naming a different table is
/// rejected rather than silently re-targeted.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((prefix, key)) = id.split_once(':') {
        if prefix != table {
            return Err(RepoError::Validation(format!(
                "Invalid {} id: {}",
                table, id
            )));
        }
        Ok(RecordId::from_table_key(table, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bare_and_canonical_ids() {
        let bare = parse_record_id("cafe_table", "t5").unwrap();
        let canonical = parse_record_id("cafe_table", "cafe_table:t5").unwrap();
        assert_eq!(bare, canonical);
    }

    #[test]
    fn parse_rejects_foreign_table_prefix() {
        assert!(parse_record_id("cafe_table", "reservation:abc").is_err());
    }
}
