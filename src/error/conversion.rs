/**
 * Error Conversion
 *
 * Conversions from `AuthError` into HTTP responses and from infrastructure
 * errors into the taxonomy.
 *
 * # Response Format
 *
 * Every failure is rendered as the uniform envelope:
 * ```json
 * {
 *   "success": false,
 *   "message": "Invalid email or password"
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::types::AuthError;

impl IntoResponse for AuthError {
    /// Convert an authentication error into the uniform failure envelope
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed with server error: {}", self.message());
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    /// Storage failures never leak driver details to the caller
    fn from(error: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", error);
        AuthError::server("Server error. Please try again later.")
    }
}
