/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Validate presence of name, email, and password
 * 2. Validate email shape, then password length
 * 3. Hash the password on the blocking pool
 * 4. Insert the account; the storage-layer UNIQUE constraint decides
 *    uniqueness races
 * 5. Issue a session token and return it with the cookie
 *
 * Validation reports the first failing rule. The conflict message never
 * reveals whether the existing account is local or external.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use crate::auth::accounts::{self, is_unique_violation, normalize_email};
use crate::auth::handlers::types::{
    token_response, AccountResponse, RegisterRequest, MIN_PASSWORD_LEN,
};
use crate::auth::passwords::hash_password;
use crate::auth::sessions::issue_token;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Basic address-shape check: nonempty local part and a dotted domain
pub(crate) fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Registration handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, malformed email, or short password
/// * `409 Conflict` - an account with this normalized email already exists
/// * `500 Internal Server Error` - hashing, storage, or signing failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AuthError> {
    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        tracing::warn!("registration rejected: missing field");
        return Err(AuthError::validation(
            "Please provide name, email, and password",
        ));
    }

    if !is_valid_email(&email) {
        tracing::warn!("registration rejected: malformed email");
        return Err(AuthError::validation("Please provide a valid email"));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("registration rejected: password too short");
        return Err(AuthError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(request.password).await?;

    let account = match accounts::create_local_account(&state.pool, email, name, password_hash)
        .await
    {
        Ok(account) => account,
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("registration rejected: email already registered");
            return Err(AuthError::conflict(
                "An account with this email already exists",
            ));
        }
        Err(e) => {
            tracing::error!("failed to create account: {:?}", e);
            return Err(AuthError::server(
                "Server error during registration. Please try again later.",
            ));
        }
    };

    let token = issue_token(
        account.id,
        &account.role,
        &state.config.jwt_secret,
        state.config.session_ttl(),
    )?;

    tracing::info!("account {} registered", account.id);

    Ok(token_response(
        StatusCode::CREATED,
        token,
        AccountResponse::from(&account),
        &state.config,
    ))
}
