/**
 * Forgot Password Handler
 *
 * POST /api/auth/forgotpassword (public)
 *
 * Request phase of the two-phase reset flow: generate a random recovery
 * token, store only its digest with a short expiry, and email the
 * plaintext inside a reset link. The plaintext is never persisted.
 *
 * This endpoint discloses whether the email exists (404 on miss). That
 * asymmetry with login is deliberate and documented; a stricter
 * deployment would answer uniformly here.
 *
 * A failed send clears the stored fields again - a token the user can
 * never receive must not stay outstanding.
 */

use axum::extract::State;
use axum::response::Json;
use chrono::Utc;

use crate::auth::accounts::{self, normalize_email};
use crate::auth::handlers::types::{ApiResponse, ForgotPasswordRequest};
use crate::auth::reset::generate_reset_token;
use crate::email::{reset_email_body, RESET_EMAIL_SUBJECT};
use crate::error::AuthError;
use crate::server::state::AppState;

/// Forgot password handler
///
/// # Errors
///
/// * `400 Bad Request` - the account only has an external identity
/// * `404 Not Found` - no account with that email
/// * `500 Internal Server Error` - email delivery unavailable or failed
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse>, AuthError> {
    let email = normalize_email(&request.email);

    let account = accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("reset requested for unknown email");
            AuthError::NotFound("No account found with that email address".to_string())
        })?;

    if !account.has_password() {
        tracing::warn!(
            "reset requested for external-identity-only account {}",
            account.id
        );
        return Err(AuthError::not_linked(
            "This account uses Google login. Please sign in with Google.",
        ));
    }

    let mailer = state.mailer.as_ref().ok_or_else(|| {
        tracing::error!("reset requested but no mailer is configured");
        AuthError::server("Email could not be sent. Please try again later.")
    })?;

    // Overwrites any prior outstanding token; the old link dies here.
    let (plaintext, digest) = generate_reset_token();
    let expires_at = Utc::now() + state.config.reset_ttl();
    accounts::set_reset_token(&state.pool, account.id, &digest, expires_at).await?;

    let reset_url = format!(
        "{}/reset-password/{}",
        state.config.frontend_url, plaintext
    );

    if let Err(e) = mailer
        .send(&account.email, RESET_EMAIL_SUBJECT, &reset_email_body(&reset_url))
        .await
    {
        tracing::error!("reset email send failed: {}", e);
        accounts::clear_reset_token(&state.pool, account.id).await?;
        return Err(AuthError::server(
            "Email could not be sent. Please try again later.",
        ));
    }

    tracing::info!("reset email sent for account {}", account.id);

    Ok(Json(ApiResponse::with_message(
        "Password reset email sent. Please check your inbox.",
    )))
}
