//! Database Module
//!
//! Embedded SurrealDB storage. Opens the engine, applies schema and index
//! definitions idempotently, and seeds the café floor plan on first start.

pub mod models;
pub mod repository;

use crate::utils::{AppError, AppResult};
use repository::TableRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "lumiere";
const DATABASE: &str = "booking";

/// Index set mirrors the hot query paths: conflict checks scan one
/// (table, date) slice, the reaper scans (status, lock_expires_at).
const SCHEMA_SQL: &str = "\
DEFINE TABLE IF NOT EXISTS cafe_table SCHEMALESS; \
DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS; \
DEFINE INDEX IF NOT EXISTS cafe_table_number_idx ON TABLE cafe_table COLUMNS number UNIQUE; \
DEFINE INDEX IF NOT EXISTS reservation_slot_idx ON TABLE reservation COLUMNS table_id, date; \
DEFINE INDEX IF NOT EXISTS reservation_expiry_idx ON TABLE reservation COLUMNS status, lock_expires_at; \
DEFINE INDEX IF NOT EXISTS reservation_customer_idx ON TABLE reservation COLUMNS customer_id;";

/// Default floor plan, seeded when the table set is empty:
/// (key, number, capacity, location)
const FLOOR_PLAN: &[(&str, i32, i32, &str)] = &[
    ("t1", 1, 2, "Window Side"),
    ("t2", 2, 2, "Corner"),
    ("t3", 3, 2, "Bar Counter"),
    ("t4", 4, 2, "Garden View"),
    ("t5", 5, 4, "Center"),
    ("t6", 6, 4, "Window Side"),
    ("t7", 7, 4, "Patio"),
    ("t8", 8, 4, "Main Hall"),
    ("t9", 9, 6, "Private Room"),
    ("t10", 10, 6, "Patio"),
    ("t11", 11, 8, "Event Space"),
    ("t12", 12, 8, "Private Room"),
];

/// Database service — opens and prepares the embedded store
pub struct DbService;

impl DbService {
    /// Open the persistent engine under `work_dir` and prepare it
    pub async fn open(work_dir: &str) -> AppResult<Surreal<Db>> {
        std::fs::create_dir_all(work_dir)
            .map_err(|e| AppError::database(format!("Failed to create {}: {}", work_dir, e)))?;
        let path = format!("{}/data", work_dir);
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::prepare(&db).await?;
        tracing::info!(path = %path, "Database opened (embedded SurrealDB, RocksDB)");
        Ok(db)
    }

    /// Open a fresh in-memory engine. Used by tests and local experiments.
    pub async fn open_in_memory() -> AppResult<Surreal<Db>> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::prepare(&db).await?;
        Ok(db)
    }

    async fn prepare(db: &Surreal<Db>) -> AppResult<()> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        db.query(SCHEMA_SQL)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

        Self::seed_floor_plan(db).await?;
        Ok(())
    }

    /// Seed the default floor plan if no tables exist yet
    async fn seed_floor_plan(db: &Surreal<Db>) -> AppResult<()> {
        let tables = TableRepository::new(db.clone());
        if tables.count().await.map_err(AppError::from)? > 0 {
            return Ok(());
        }

        for (key, number, capacity, location) in FLOOR_PLAN {
            tables
                .insert_seed(key, *number, *capacity, location)
                .await
                .map_err(AppError::from)?;
        }
        tracing::info!(tables = FLOOR_PLAN.len(), "Seeded default floor plan");
        Ok(())
    }
}
