//! Database models

pub mod cafe_table;
pub mod reservation;
pub mod serde_helpers;

pub use cafe_table::CafeTable;
pub use reservation::{Reservation, ReservationStatus};
