//! Café Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::CafeTable;
use crate::db::repository::TableRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - the active floor plan, in table-number order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CafeTable>>> {
    let repo = TableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - a single table
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CafeTable>> {
    let repo = TableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(Json(table))
}
