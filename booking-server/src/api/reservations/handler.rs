//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::booking::{
    AvailabilityService, CancellationService, ConfirmationService, ExpiryReaper, LockRequest,
    LockService, Requester,
};
use crate::core::ServerState;
use crate::db::models::{CafeTable, Reservation, ReservationStatus};
use crate::db::repository::ReservationRepository;
use crate::utils::{AppError, AppResult};

/// Original booking flow default: a table seating lasts 90 minutes
fn default_duration() -> i64 {
    90
}

fn default_false() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct AvailableTablesRequest {
    pub date: String,
    pub time: String,
    pub guests: i32,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct LockTableRequest {
    pub table_id: String,
    pub date: String,
    pub time: String,
    pub guests: i32,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    pub customer_id: String,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmReservationRequest {
    pub reservation_id: String,
    pub customer_id: String,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequesterParams {
    pub customer_id: String,
    #[serde(default = "default_false")]
    pub staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseExpiredRequest {
    #[serde(default = "default_false")]
    pub staff: bool,
}

#[derive(Debug, Serialize)]
pub struct ReservationStatusResponse {
    pub reservation_id: String,
    pub status: ReservationStatus,
    /// Seconds left on the lock countdown; only present while locked
    pub lock_remaining_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReleaseExpiredResponse {
    pub released_count: usize,
}

/// POST /api/reservations/available-tables - free tables for a window
pub async fn available_tables(
    State(state): State<ServerState>,
    Json(payload): Json<AvailableTablesRequest>,
) -> AppResult<Json<Vec<CafeTable>>> {
    let service = AvailabilityService::new(state.db.clone(), state.clock.clone());
    let tables = service
        .find_available(
            &payload.date,
            &payload.time,
            payload.duration_minutes,
            payload.guests,
        )
        .await?;
    Ok(Json(tables))
}

/// POST /api/reservations/lock - hold a table for 5 minutes
pub async fn lock(
    State(state): State<ServerState>,
    Json(payload): Json<LockTableRequest>,
) -> AppResult<Json<Reservation>> {
    let service = LockService::new(state.db.clone(), state.clock.clone());
    let reservation = service
        .lock(LockRequest {
            table_id: payload.table_id,
            date: payload.date,
            start_time: payload.time,
            duration_minutes: payload.duration_minutes,
            guests: payload.guests,
            customer_id: payload.customer_id,
            special_requests: payload.special_requests,
        })
        .await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/confirm - convert a hold into a booking
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmReservationRequest>,
) -> AppResult<Json<Reservation>> {
    let service =
        ConfirmationService::new(state.db.clone(), state.clock.clone(), state.notifier.clone());
    let reservation = service
        .confirm(
            &payload.reservation_id,
            &payload.customer_id,
            payload.special_requests,
        )
        .await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/{id}/cancel - release a hold or booking
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RequesterParams>,
) -> AppResult<Json<Reservation>> {
    let service =
        CancellationService::new(state.db.clone(), state.clock.clone(), state.notifier.clone());
    let reservation = service
        .cancel(
            &id,
            Requester {
                customer_id: payload.customer_id,
                staff: payload.staff,
            },
        )
        .await?;
    Ok(Json(reservation))
}

/// GET /api/reservations/{id} - holder or staff view of one reservation
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<RequesterParams>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;

    if !params.staff && reservation.customer_id != params.customer_id {
        return Err(AppError::forbidden(
            "Only the holder or staff may view this reservation",
        ));
    }
    Ok(Json(reservation))
}

/// GET /api/reservations/{id}/status - lock countdown, with lazy expiry.
///
/// Public: the UI polls this while the customer fills in details. An
/// overdue lock is physically expired here with the same conditional
/// primitive the reaper uses.
pub async fn status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReservationStatusResponse>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;

    let now = state.clock.now_millis();
    let (status, lock_remaining_seconds) = if reservation.lock_overdue(now) {
        repo.expire_one(&id, now).await?;
        (ReservationStatus::Expired, None)
    } else if reservation.status == ReservationStatus::Locked {
        let remaining = reservation
            .lock_expires_at
            .map(|exp| (exp - now).max(0) / 1000);
        (ReservationStatus::Locked, remaining)
    } else {
        (reservation.status, None)
    };

    Ok(Json(ReservationStatusResponse {
        reservation_id: reservation.id_string(),
        status,
        lock_remaining_seconds,
    }))
}

/// GET /api/reservations/by-customer/{customer_id} - booking history
pub async fn list_by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservations = repo.find_by_customer(&customer_id).await?;
    Ok(Json(reservations))
}

/// POST /api/reservations/release-expired - staff-triggered sweep,
/// same conditional transition the background reaper performs
pub async fn release_expired(
    State(state): State<ServerState>,
    Json(payload): Json<ReleaseExpiredRequest>,
) -> AppResult<Json<ReleaseExpiredResponse>> {
    if !payload.staff {
        return Err(AppError::forbidden("Staff privilege required"));
    }

    let reaper = ExpiryReaper::new(
        state.db.clone(),
        state.clock.clone(),
        state.config.reaper_interval_secs,
    );
    let released_count = reaper.sweep().await?;
    Ok(Json(ReleaseExpiredResponse { released_count }))
}
