//! Booking engine
//!
//! The reservation allocation core: lock-then-confirm workflow, its state
//! machine, its expiry policy, and the atomicity guarantees that prevent
//! double-booking. All cross-request coordination happens in the store's
//! conditional writes; these services hold no locks and share no in-process
//! mutable state.
//!
//! # Components
//!
//! - [`AvailabilityService`] - which tables are free for a window
//! - [`LockService`] - short-lived holds with a 5-minute TTL
//! - [`ConfirmationService`] - lock → durable confirmed reservation
//! - [`CancellationService`] - immediate release from locked/confirmed
//! - [`ExpiryReaper`] - periodic reclamation of overdue locks
//! - [`Clock`] - injected time source for TTL comparisons

pub mod availability;
pub mod cancel;
pub mod clock;
pub mod confirm;
pub mod lock;
pub mod reaper;
pub mod window;

pub use availability::AvailabilityService;
pub use cancel::{CancellationService, Requester};
pub use clock::{Clock, ManualClock, SystemClock};
pub use confirm::ConfirmationService;
pub use lock::{LockRequest, LockService};
pub use reaper::ExpiryReaper;
pub use window::BookingWindow;

/// How long an unconfirmed lock holds its table. Fixed for the whole
/// system, compared against the clock as a data-level deadline.
pub const LOCK_TTL_MINUTES: i64 = 5;
