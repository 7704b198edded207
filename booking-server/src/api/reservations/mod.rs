//! Reservation API module
//!
//! The booking workflow over HTTP: availability → lock → confirm, with
//! cancel and status checks alongside. Identity fields (`customer_id`,
//! `staff`) arrive in the request; the Auth collaborator that vouches for
//! them is out of scope here.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/available-tables", post(handler::available_tables))
        .route("/lock", post(handler::lock))
        .route("/confirm", post(handler::confirm))
        .route("/release-expired", post(handler::release_expired))
        .route("/by-customer/{customer_id}", get(handler::list_by_customer))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", get(handler::status))
        .route("/{id}/cancel", delete(handler::cancel))
}
