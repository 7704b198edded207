//! Unified error handling
//!
//! Application error type shared by the booking engine and the HTTP layer:
//! - [`AppError`] - typed business and system errors
//! - [`AppResult`] - result alias used across the crate
//!
//! Conflict / Expired / Forbidden are expected business outcomes of the
//! lock-then-confirm workflow. Callers are expected to branch on them
//! (re-query availability after a Conflict, re-lock after an Expired),
//! so they carry enough context to act on without parsing messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db::repository::RepoError;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad date/time, past window, non-positive duration,
    /// party size out of range (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown table or reservation id (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Requester is not the holder and has no staff privilege (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Lock race lost, double-cancel, or confirm of a settled row (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Lock TTL elapsed before confirmation (410)
    #[error("Lock expired: {0}")]
    Expired(String),

    /// Store unreachable or query failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else that should never surface in normal operation (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Error payload returned to HTTP clients
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Expired(msg) => (StatusCode::GONE, "lock_expired", msg.clone()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type,
            message,
        });

        (status, body).into_response()
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_client_statuses() {
        let cases = [
            (AppError::validation("bad date"), StatusCode::BAD_REQUEST),
            (AppError::not_found("reservation"), StatusCode::NOT_FOUND),
            (AppError::forbidden("not the holder"), StatusCode::FORBIDDEN),
            (AppError::conflict("slot taken"), StatusCode::CONFLICT),
            (AppError::expired("ttl elapsed"), StatusCode::GONE),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn repo_errors_convert_losslessly() {
        let err: AppError = RepoError::Conflict("slot taken".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = RepoError::NotFound("reservation x".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
