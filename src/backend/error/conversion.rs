/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, so handlers can return
 * `Result<_, BackendError>` directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * Insufficient-credit errors add `message`, `requiredCredits` and
 * `code: "INSUFFICIENT_CREDITS"`.
 */

use axum::{
    response::{Response, IntoResponse},
    Json,
};
use crate::backend::error::types::BackendError;

/// Machine-readable code sent with 402 responses
pub const INSUFFICIENT_CREDITS_CODE: &str = "INSUFFICIENT_CREDITS";

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        if let BackendError::InsufficientCredits { required, message } = &self {
            body["message"] = serde_json::json!(message);
            body["requiredCredits"] = serde_json::json!(required);
            body["code"] = serde_json::json!(INSUFFICIENT_CREDITS_CODE);
        }

        (status, Json(body)).into_response()
    }
}
