//! Shared test environment: in-memory store, manual clock, seeded floor plan

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use booking_server::{
    AvailabilityService, CancellationService, Config, ConfirmationService, DbService,
    ExpiryReaper, LockRequest, LockService, ManualClock, NotifierService, Reservation,
    ServerState,
};

/// Two days before the canonical test booking date (2025-06-01 18:00)
pub const TEST_EPOCH: (i32, u32, u32, u32, u32, u32) = (2025, 5, 30, 12, 0, 0);

pub async fn test_env() -> (ServerState, Arc<ManualClock>) {
    let db = DbService::open_in_memory().await.unwrap();
    let (y, mo, d, h, mi, s) = TEST_EPOCH;
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap(),
    ));
    let config = Config::with_overrides("/tmp/booking-server-test", 0);
    let state = ServerState::with_parts(config, db, clock.clone(), NotifierService::new());
    (state, clock)
}

pub fn lock_service(state: &ServerState) -> LockService {
    LockService::new(state.db.clone(), state.clock.clone())
}

pub fn availability_service(state: &ServerState) -> AvailabilityService {
    AvailabilityService::new(state.db.clone(), state.clock.clone())
}

pub fn confirmation_service(state: &ServerState) -> ConfirmationService {
    ConfirmationService::new(state.db.clone(), state.clock.clone(), state.notifier.clone())
}

pub fn cancellation_service(state: &ServerState) -> CancellationService {
    CancellationService::new(state.db.clone(), state.clock.clone(), state.notifier.clone())
}

pub fn reaper(state: &ServerState) -> ExpiryReaper {
    ExpiryReaper::new(state.db.clone(), state.clock.clone(), 30)
}

/// Lock request for the canonical slot: table 5, 2025-06-01, 18:00, 90min
pub fn table5_request(customer_id: &str) -> LockRequest {
    slot_request("t5", "2025-06-01", "18:00", 90, 4, customer_id)
}

pub fn slot_request(
    table_id: &str,
    date: &str,
    start_time: &str,
    duration_minutes: i64,
    guests: i32,
    customer_id: &str,
) -> LockRequest {
    LockRequest {
        table_id: table_id.to_string(),
        date: date.to_string(),
        start_time: start_time.to_string(),
        duration_minutes,
        guests,
        customer_id: customer_id.to_string(),
        special_requests: None,
    }
}

pub async fn lock_table5(state: &ServerState, customer_id: &str) -> Reservation {
    lock_service(state)
        .lock(table5_request(customer_id))
        .await
        .unwrap()
}
