/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Request-level failures with an explicit status code:
 * - Missing or invalid bearer token (401)
 * - Ownership / role checks (403, 404)
 * - Invalid payloads (400)
 * - A required database that is not configured (503)
 *
 * ## Credit Errors
 *
 * The user cannot afford the requested AI action (402). The response body
 * carries the required amount so the frontend can show the upgrade modal.
 *
 * ## Infrastructure Errors
 *
 * Database, AI provider and main-backend failures. These are logged with
 * full detail and surfaced to the client with a generic message.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::backend::generation::GenerationError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use link_ai::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Slug already exists");
/// let err = BackendError::not_found("Page not found");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The user's plan cannot pay for the requested action
    #[error("Insufficient credits: {required} required")]
    InsufficientCredits {
        /// Credits the action costs
        required: f64,
        /// Explanation shown to the user
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// AI provider error
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Outbound HTTP error (main backend)
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Shared error (validation, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 503 Service Unavailable for a dependency that is not configured
    pub fn unavailable(dependency: &str) -> Self {
        Self::handler(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{dependency} is not configured"),
        )
    }

    /// 402 Payment Required
    pub fn insufficient_credits(required: f64, message: impl Into<String>) -> Self {
        Self::InsufficientCredits {
            required,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `InsufficientCredits` - 402 Payment Required
    /// - `Database`, `Generation`, `SerializationError` - 500
    /// - `Upstream` - 502 Bad Gateway
    /// - `SharedError` - 400 for validation, 500 for serialization
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Infrastructure errors are reduced to a generic message; the detail
    /// only goes to the log.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::InsufficientCredits { .. } => "Insufficient credits".to_string(),
            Self::Database(_) => "Internal server error".to_string(),
            Self::Generation(_) => "Failed to generate page with AI".to_string(),
            Self::Upstream(_) => "Upstream service error".to_string(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        assert_matches!(
            error,
            BackendError::HandlerError { status, ref message }
                if status == StatusCode::BAD_REQUEST && message == "Invalid request"
        );
    }

    #[test]
    fn test_generation_error_converts() {
        let error: BackendError = GenerationError::NoProvider.into();
        assert_matches!(error, BackendError::Generation(GenerationError::NoProvider));
        assert_eq!(error.message(), "Failed to generate page with AI");
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            BackendError::unavailable("Database").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            BackendError::insufficient_credits(2.0, "x").status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            BackendError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_message_is_generic() {
        let error = BackendError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(error.message(), "Internal server error");
        assert!(error.to_string().contains("pool timed out"));
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("title", "required").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("title"));
    }

    #[test]
    fn test_unavailable_message() {
        let error = BackendError::unavailable("Main database");
        assert_eq!(error.message(), "Main database is not configured");
    }
}
