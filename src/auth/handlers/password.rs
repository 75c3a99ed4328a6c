/**
 * Update Password Handler
 *
 * PUT /api/auth/updatepassword (protected)
 *
 * Replaces the password of an authenticated account after verifying the
 * current one. Storing the new hash also clears any outstanding reset
 * token, and the response carries a fresh session token.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use crate::auth::accounts;
use crate::auth::handlers::types::{
    token_response, AccountResponse, UpdatePasswordRequest, MIN_PASSWORD_LEN,
};
use crate::auth::passwords::{hash_password, verify_password};
use crate::auth::sessions::issue_token;
use crate::error::AuthError;
use crate::middleware::AuthAccount;
use crate::server::state::AppState;

/// Update password handler
///
/// # Errors
///
/// * `400 Bad Request` - short new password, or the account only has an
///   external identity
/// * `401 Unauthorized` - current password does not verify
/// * `500 Internal Server Error` - hashing, storage, or signing failure
pub async fn update_password(
    State(state): State<AppState>,
    AuthAccount(current): AuthAccount,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Response, AuthError> {
    if request.new_password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("password update rejected: new password too short");
        return Err(AuthError::validation(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    // The gateway projection has no hash; fetch the stored record.
    let account = accounts::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("password update: account {} vanished", current.id);
            AuthError::unauthorized("Not authorized to access this resource")
        })?;

    let password_hash = match &account.password_hash {
        Some(hash) => hash.clone(),
        None => {
            tracing::warn!(
                "password update rejected: account {} has no local password",
                account.id
            );
            return Err(AuthError::not_linked(
                "This account uses Google login. Please sign in with Google.",
            ));
        }
    };

    if !verify_password(request.current_password, password_hash).await? {
        tracing::warn!("password update rejected: wrong current password");
        return Err(AuthError::unauthorized("Current password is incorrect"));
    }

    let new_hash = hash_password(request.new_password).await?;
    let updated = accounts::update_password(&state.pool, account.id, new_hash).await?;

    let token = issue_token(
        updated.id,
        &updated.role,
        &state.config.jwt_secret,
        state.config.session_ttl(),
    )?;

    tracing::info!("account {} changed its password", updated.id);

    Ok(token_response(
        StatusCode::OK,
        token,
        AccountResponse::from(&updated),
        &state.config,
    ))
}
