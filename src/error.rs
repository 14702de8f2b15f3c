//! Error types for the product service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures of the product persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file holds data that is not a product collection
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Notify Error Enum ==
/// Failures while delivering an expiry notice.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid address: {0}")]
    Address(String),

    /// Message could not be assembled
    #[error("Message build failed: {0}")]
    Build(String),

    /// Transport rejected or failed to deliver the message
    #[error("Transport failed: {0}")]
    Transport(String),

    /// Send did not finish in time
    #[error("Send timed out after {0:?}")]
    Timeout(std::time::Duration),
}

// == Scan Error Enum ==
/// Reasons an expiration scan did not run to completion.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Another scan holds the single-flight guard
    #[error("A scan is already running")]
    AlreadyRunning,

    /// Candidate products could not be loaded
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == App Error Enum ==
/// Error type returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required request data missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Lookup matched no product
    #[error("{0}")]
    NotFound(String),

    /// Persistence failure, details stay in the log
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Store(err) => {
                error!("Store operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, AppError>;
