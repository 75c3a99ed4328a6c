/**
 * Reset Password Handler
 *
 * PUT /api/auth/resetpassword/{token} (public)
 *
 * Consumption phase of the reset flow. The supplied plaintext token is
 * hashed and matched against a stored digest with a still-future expiry;
 * the password swap and token clear happen in one atomic statement, so
 * the token is single-use even under concurrent attempts. A wrong,
 * already-consumed, and expired token all fail identically.
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;

use crate::auth::accounts;
use crate::auth::handlers::types::{
    token_response, AccountResponse, ResetPasswordRequest, MIN_PASSWORD_LEN,
};
use crate::auth::passwords::hash_password;
use crate::auth::reset::hash_reset_token;
use crate::auth::sessions::issue_token;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Reset password handler
///
/// # Errors
///
/// * `400 Bad Request` - short new password, or an invalid/consumed/
///   expired token (conflated by design)
/// * `500 Internal Server Error` - hashing, storage, or signing failure
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Response, AuthError> {
    if request.password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("reset rejected: new password too short");
        return Err(AuthError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let digest = hash_reset_token(&token);
    let new_hash = hash_password(request.password).await?;

    let account = accounts::consume_reset_token(&state.pool, &digest, new_hash, Utc::now())
        .await?
        .ok_or_else(|| {
            tracing::warn!("reset rejected: token did not match an unexpired digest");
            AuthError::InvalidResetToken("Invalid or expired reset token".to_string())
        })?;

    let session = issue_token(
        account.id,
        &account.role,
        &state.config.jwt_secret,
        state.config.session_ttl(),
    )?;

    tracing::info!("account {} completed a password reset", account.id);

    Ok(token_response(
        StatusCode::OK,
        session,
        AccountResponse::from(&account),
        &state.config,
    ))
}
