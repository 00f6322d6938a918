//! Error type system for Gatehouse
//!
//! This module provides the error taxonomy shared by every layer:
//! - A single `ServiceError` enum for unexpected failures and transport-level rejections
//! - HTTP status code mapping that never leaks internal causes to callers
//! - Error responses carrying trace IDs
//!
//! Expected rejections (duplicate email, password confirmation mismatch) are
//! not errors; see `auth::outcome`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Message sent to callers for every authentication failure
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated";

/// Message sent to callers for every internal failure
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Main error type for Gatehouse
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Credentials or bearer token rejected. Carries no detail on purpose.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task error: {0}")]
    Task(String),
}

impl ServiceError {
    /// Whether this error is an internal failure rather than a rejected caller
    pub fn is_internal(&self) -> bool {
        !matches!(self, ServiceError::Unauthenticated)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        if self.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        if self.is_internal() {
            "InternalError"
        } else {
            "Unauthenticated"
        }
    }

    /// Message safe to hand to a caller
    pub fn public_message(&self) -> &'static str {
        if self.is_internal() {
            INTERNAL_MESSAGE
        } else {
            UNAUTHENTICATED_MESSAGE
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a ServiceError
    pub fn from_error(error: &ServiceError) -> Self {
        Self::new(
            error.error_type().to_string(),
            error.public_message().to_string(),
        )
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (trace_id: {})", self.error, self.message, self.trace_id)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if self.is_internal() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: unauthenticated"
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
