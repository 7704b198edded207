//! Café Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Café table entity — static floor-plan reference data.
///
/// The booking engine never mutates tables; it only reads them to answer
/// availability queries and to validate party size at lock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-facing table number, unique across the floor plan
    pub number: i32,
    #[serde(default)]
    pub capacity: i32,
    /// e.g. "Window Side", "Patio", "Private Room"
    pub location: String,
    /// Inactive tables are never offered or lockable
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CafeTable {
    /// Canonical `cafe_table:<key>` id string, empty for unsaved rows
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}
