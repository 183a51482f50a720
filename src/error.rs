//! Error types for the cache engine, registry and admin API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for configuration, registry and admin API faults.
///
/// Cache operations themselves (`put`, `get`, `clear`) never fail; a miss or
/// an expired entry is reported as `None`, not as an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache configuration rejected at construction time
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// A cache with this name is already registered
    #[error("Cache already registered: {0}")]
    DuplicateCache(String),

    /// No cache registered under this name
    #[error("Unknown cache: {0}")]
    UnknownCache(String),

    /// Cache exists but holds a different value type
    #[error("Cache '{0}' holds a different value type")]
    TypeMismatch(String),

    /// Key not present (or expired) in a cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::DuplicateCache(_) => StatusCode::CONFLICT,
            CacheError::UnknownCache(_) => StatusCode::NOT_FOUND,
            CacheError::TypeMismatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
