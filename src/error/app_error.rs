use axum::extract::rejection::JsonRejection;
use thiserror::Error;

use crate::services::IndexNowError;
use crate::services::notifications::DispatchError;

/// Application-wide error type for the HTTP layer.
///
/// Service errors convert in with `?`; the status mapping lives in
/// `api::middleware::error_handler`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A submission could not be dispatched
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Forwarding to the search-index API failed
    #[error(transparent)]
    IndexNow(#[from] IndexNowError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
