//! Error types for the cache service
//!
//! Layer operations report failures as `LayerError` values so the coordinator
//! can degrade them to misses explicitly; `ApiError` is the HTTP boundary.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Layer Error Enum ==
/// Failure of a single cache-layer operation.
///
/// None of these are fatal for the process: the coordinator treats a failed
/// read as a miss and a failed write as an unsuccessful write.
#[derive(Error, Debug)]
pub enum LayerError {
    /// Could not obtain a connection from the pool
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Transport-level failure talking to the durable store
    #[error("transport error: {0}")]
    Transport(#[from] redis::RedisError),

    /// Operation exceeded its configured timeout
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Stored payload could not be encoded or decoded
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unexpected in-process failure
    #[error("internal cache error: {0}")]
    Internal(String),
}

// == API Error Enum ==
/// Error surfaced to HTTP clients of the cache service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in any layer
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
