/**
 * Authentication Error Types
 *
 * This module defines the error taxonomy for the authentication core.
 * Each variant maps to an HTTP status class and carries the message that
 * is safe to show the caller.
 *
 * # Error Categories
 *
 * - `Validation` - malformed input, recoverable by caller correction (400)
 * - `Conflict` - duplicate email at registration (409)
 * - `Unauthorized` - bad credentials, bad/expired token, missing auth (401)
 * - `NotLinked` - password operation on an external-identity-only account (400)
 * - `InvalidResetToken` - reset consumption failure, causes conflated (400)
 * - `NotFound` - reset request for an unknown email (404)
 * - `NotConfigured` - capability absent (e.g. Google OAuth) (501)
 * - `Server` - storage/hashing/email infrastructure failure (500)
 *
 * The store and hashing layers never construct these directly for the
 * caller; flow-level handlers translate typed failures into this taxonomy.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Authentication core error taxonomy
///
/// The `Unauthorized` variant is deliberately low-detail: login failures
/// and gateway rejections must not reveal whether an account exists or
/// whether a token was malformed versus expired.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (missing field, bad email shape, short password)
    #[error("{0}")]
    Validation(String),

    /// Duplicate email at registration
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials, bad/expired token, or missing authentication
    #[error("{0}")]
    Unauthorized(String),

    /// Password operation attempted on an external-identity-only account
    #[error("{0}")]
    NotLinked(String),

    /// Reset-token consumption failed (wrong, consumed, or expired token)
    #[error("{0}")]
    InvalidResetToken(String),

    /// Lookup failure the endpoint is allowed to disclose
    #[error("{0}")]
    NotFound(String),

    /// Capability not configured on this deployment
    #[error("{0}")]
    NotConfigured(String),

    /// Storage, hashing, or email infrastructure failure
    #[error("{0}")]
    Server(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_linked(message: impl Into<String>) -> Self {
        Self::NotLinked(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation`, `NotLinked`, `InvalidResetToken` - 400 Bad Request
    /// - `Unauthorized` - 401 Unauthorized
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `NotConfigured` - 501 Not Implemented
    /// - `Server` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotLinked(_) | Self::InvalidResetToken(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotConfigured(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the caller-facing error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}
