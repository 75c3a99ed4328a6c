/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Security
 *
 * - Unknown email and wrong password fail with the identical message, so
 *   an unauthenticated caller cannot enumerate accounts.
 * - An external-identity-only account gets an explicit redirect-to-
 *   provider error instead: the caller already supplied the matching
 *   email expecting password auth, so existence is not the secret here.
 * - Verification runs through the hashing service (bcrypt, blocking
 *   pool); a corrupt stored digest denies instead of erroring.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use crate::auth::accounts::{self, normalize_email};
use crate::auth::handlers::types::{token_response, AccountResponse, LoginRequest};
use crate::auth::passwords::verify_password;
use crate::auth::sessions::issue_token;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Message shared by the unknown-email and wrong-password failures
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, or the account only has an
///   external identity
/// * `401 Unauthorized` - unknown email or wrong password (same message)
/// * `500 Internal Server Error` - storage or signing failure
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let email = normalize_email(&request.email);

    if email.is_empty() || request.password.is_empty() {
        tracing::warn!("login rejected: missing field");
        return Err(AuthError::validation("Please provide email and password"));
    }

    let account = accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("login failed: unknown email");
            AuthError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let password_hash = match &account.password_hash {
        Some(hash) => hash.clone(),
        None => {
            tracing::warn!("login failed: account {} has no local password", account.id);
            return Err(AuthError::not_linked(
                "This account uses Google login. Please sign in with Google.",
            ));
        }
    };

    if !verify_password(request.password, password_hash).await? {
        tracing::warn!("login failed: wrong password for {}", account.id);
        return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(
        account.id,
        &account.role,
        &state.config.jwt_secret,
        state.config.session_ttl(),
    )?;

    tracing::info!("account {} logged in", account.id);

    Ok(token_response(
        StatusCode::OK,
        token,
        AccountResponse::from(&account),
        &state.config,
    ))
}
