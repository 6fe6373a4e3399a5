//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and the mapping
//! from core errors to HTTP responses.

use axum::http::StatusCode;

use crate::config::ConfigError;
use hydration_core::ports::CoreError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Maps a core error to the status code and body the handlers answer with.
///
/// Client mistakes answer 4xx with the core's message; the two server-side
/// kinds answer 5xx without leaking internals beyond the message text.
pub fn core_error_response(err: CoreError) -> (StatusCode, String) {
    let status = match err {
        CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        CoreError::InvalidState(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_error_kind_keeps_its_own_status() {
        let cases = [
            (
                CoreError::InvalidArgument("amount".into()),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::NotFound("user".into()), StatusCode::NOT_FOUND),
            (CoreError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                CoreError::InvalidState("zero goal".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CoreError::StoreUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            let (status, message) = core_error_response(err);
            assert_eq!(status, expected);
            assert!(!message.is_empty());
        }
    }
}
