//! Lumière Booking Server - café table reservation engine
//!
//! # Architecture overview
//!
//! The core of this server is the reservation allocation engine: a
//! lock-then-confirm workflow over scarce physical tables, built entirely
//! on the embedded store's atomic conditional writes. No in-process mutex
//! or shared map guards a slot; for any contested (table, window) or
//! reservation row the store linearizes concurrent attempts and exactly
//! one wins.
//!
//! - **Booking engine** (`booking`): availability, lock, confirm, cancel,
//!   expiry reaper, clock
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **HTTP API** (`api`): RESTful interface over the workflow
//! - **Services** (`services`): booking event notifier
//!
//! # Module structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── booking/       # the reservation allocation engine
//! ├── db/            # database layer (models, repositories)
//! ├── services/      # notifier
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging, time helpers
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use booking::{
    AvailabilityService, BookingWindow, CancellationService, Clock, ConfirmationService,
    ExpiryReaper, LockRequest, LockService, ManualClock, Requester, SystemClock,
    LOCK_TTL_MINUTES,
};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use db::models::{CafeTable, Reservation, ReservationStatus};
pub use services::{BookingEvent, NotifierService};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging. Call once, before anything logs.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}

pub fn print_banner() {
    println!(
        r#"
    __                _
   / /   __  ______ _(_)__  ________
  / /   / / / / __ `/ / _ \/ ___/ _ \
 / /___/ /_/ / / / / /  __/ /  /  __/
/_____/\__,_/_/ /_/_/\___/_/   \___/
    booking
    "#
    );
}
