//! Café Table Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::CafeTable;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

const TABLE: &str = "cafe_table";

#[derive(Clone)]
pub struct TableRepository {
    base: BaseRepository,
}

impl TableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active tables in table-number order
    pub async fn find_all(&self) -> RepoResult<Vec<CafeTable>> {
        let tables: Vec<CafeTable> = self
            .base
            .db()
            .query("SELECT * FROM cafe_table WHERE is_active = true ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find active tables that can seat the party, in table-number order
    pub async fn find_seatable(&self, guests: i32) -> RepoResult<Vec<CafeTable>> {
        let tables: Vec<CafeTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM cafe_table \
                 WHERE is_active = true AND capacity >= $guests \
                 ORDER BY number",
            )
            .bind(("guests", guests))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CafeTable>> {
        let thing = parse_record_id(TABLE, id)?;
        let table: Option<CafeTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Number of tables on the floor plan (active or not)
    pub async fn count(&self) -> RepoResult<usize> {
        let all: Vec<CafeTable> = self.base.db().select(TABLE).await?;
        Ok(all.len())
    }

    /// Insert a floor-plan table under a fixed key (used by seeding)
    pub async fn insert_seed(
        &self,
        key: &str,
        number: i32,
        capacity: i32,
        location: &str,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "CREATE type::thing('cafe_table', $key) CONTENT { \
                   number: $number, \
                   capacity: $capacity, \
                   location: $location, \
                   is_active: true \
                 }",
            )
            .bind(("key", key.to_string()))
            .bind(("number", number))
            .bind(("capacity", capacity))
            .bind(("location", location.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
