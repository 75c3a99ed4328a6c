/**
 * Authentication Handler Types
 *
 * Request and response types shared across the authentication handlers,
 * plus the uniform response envelope and the helper that delivers a
 * session token as both an envelope field and a session cookie.
 */

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::auth::accounts::Account;
use crate::auth::sessions::session_cookie;
use crate::middleware::CurrentAccount;
use crate::server::config::AppConfig;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address (normalized before storage)
    pub email: String,
    /// Plaintext password (hashed before storage)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Forgot-password request
#[derive(Deserialize, Serialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset-password request (the token arrives as a path segment)
#[derive(Deserialize, Serialize, Debug)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Update-password request
#[derive(Deserialize, Serialize, Debug)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Safe account projection
///
/// Everything a client may see; never the password hash or reset-token
/// fields.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.display_name.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
        }
    }
}

impl From<&CurrentAccount> for AccountResponse {
    fn from(account: &CurrentAccount) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.display_name.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
        }
    }
}

/// Uniform response envelope
///
/// Every success and failure in this core carries this shape; failures
/// are produced by the error module with `success: false`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Success envelope carrying a token and account projection
    pub fn with_token(token: String, user: AccountResponse) -> Self {
        Self {
            success: true,
            token: Some(token),
            user: Some(user),
            message: None,
        }
    }

    /// Success envelope carrying an account projection only
    pub fn with_user(user: AccountResponse) -> Self {
        Self {
            success: true,
            token: None,
            user: Some(user),
            message: None,
        }
    }

    /// Success envelope carrying a message only
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            token: None,
            user: None,
            message: Some(message.into()),
        }
    }
}

/// Build the response that hands a fresh session token to the caller
///
/// The token travels twice: in the envelope for programmatic clients and
/// in the session cookie for browsers.
pub fn token_response(
    status: StatusCode,
    token: String,
    user: AccountResponse,
    config: &AppConfig,
) -> Response {
    let cookie = session_cookie(&token, config.session_ttl(), config.secure_cookies);

    let mut response =
        (status, Json(ApiResponse::with_token(token, user))).into_response();

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => {
            tracing::error!("failed to encode session cookie: {:?}", e);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::with_message("ok")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
        assert!(json.get("token").is_none());
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_account_projection_has_no_secrets() {
        let account = CurrentAccount {
            id: uuid::Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            role: "user".to_string(),
        };
        let json = serde_json::to_value(AccountResponse::from(&account)).unwrap();
        let rendered = json.to_string();
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("hash"));
    }
}
