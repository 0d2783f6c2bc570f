//! # REST API Errors
//!
//! Error taxonomy for the store routes and the bodies they render to.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::FieldViolation;
use crate::storage::StorageError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body could not be parsed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// One or more field rules were violated
    #[error("Validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// No store with the requested id
    #[error("Store not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Backend read or write failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error envelope: `{"error": ...}` or `{"errors": [...]}`.
    ///
    /// Server-side details stay in the logs.
    pub fn body(&self) -> Value {
        match self {
            ApiError::InvalidPayload(detail) => json!({
                "error": "Invalid payload",
                "details": detail,
            }),
            ApiError::Validation(violations) => json!({ "errors": violations }),
            ApiError::NotFound => json!({ "error": "Store not found" }),
            ApiError::Storage(_) => json!({ "error": "Storage operation failed" }),
            ApiError::Internal(_) => json!({ "error": "Internal server error" }),
        }
    }

    /// Emit a log event matching the severity of this error
    pub fn log(&self) {
        match self {
            ApiError::Storage(e) => tracing::error!(error = %e, "storage failure"),
            ApiError::Internal(e) => tracing::error!(error = %e, "internal failure"),
            ApiError::InvalidPayload(detail) => tracing::debug!(%detail, "rejected payload"),
            ApiError::Validation(violations) => {
                tracing::debug!(count = violations.len(), "validation failed")
            }
            ApiError::NotFound => {}
        }
    }
}

impl From<Vec<FieldViolation>> for ApiError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        ApiError::Validation(violations)
    }
}
