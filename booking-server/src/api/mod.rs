//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`tables`] - floor plan (read-only reference data)
//! - [`reservations`] - the booking workflow

pub mod health;
pub mod reservations;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(reservations::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
