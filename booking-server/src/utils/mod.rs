//! Utility module - shared error type, logging and time helpers

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
