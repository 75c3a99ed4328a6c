/**
 * Google OAuth Handlers
 *
 * GET /api/auth/google          - send the browser to the consent screen
 * GET /api/auth/google/callback - finish the exchange and hand back a token
 *
 * The caller here is a browser mid-redirect, not an API client, so both
 * outcomes of the callback are redirects to the configured front end:
 * success carries the session token as a query parameter (the exchange
 * crosses a redirect boundary, so the cookie path is not used), failure
 * lands on the login page with an error marker.
 *
 * When provider credentials are not configured, both routes answer a
 * fixed envelope instead.
 */

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::oauth::{resolve_external_identity, GOOGLE_PROVIDER};
use crate::auth::sessions::issue_token;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Query parameters Google appends to the callback redirect
#[derive(Deserialize, Debug)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

fn not_configured() -> AuthError {
    AuthError::NotConfigured(
        "Google OAuth is not configured on this server.".to_string(),
    )
}

fn failure_redirect(frontend_url: &str) -> Redirect {
    Redirect::to(&format!("{}/login?error=auth_failed", frontend_url))
}

/// Start the Google OAuth flow
pub async fn google_start(State(state): State<AppState>) -> Result<Response, AuthError> {
    let client = state.google.as_ref().ok_or_else(not_configured)?;
    Ok(Redirect::to(&client.authorize_url()).into_response())
}

/// Finish the Google OAuth flow
///
/// Exchanges the authorization code, resolves the external identity to
/// exactly one account, issues a session token, and redirects to the
/// front-end callback with the token attached.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AuthError> {
    let client = state.google.as_ref().ok_or_else(not_configured)?;
    let frontend_url = &state.config.frontend_url;

    let code = match (query.code, query.error) {
        (Some(code), _) => code,
        (None, error) => {
            tracing::warn!("google callback without code: {:?}", error);
            return Ok(failure_redirect(frontend_url).into_response());
        }
    };

    let profile = match client.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(_) => return Ok(failure_redirect(frontend_url).into_response()),
    };

    let account = match resolve_external_identity(&state.pool, GOOGLE_PROVIDER, &profile).await
    {
        Ok(account) => account,
        Err(e) => {
            tracing::error!("external identity resolution failed: {}", e);
            return Ok(failure_redirect(frontend_url).into_response());
        }
    };

    let token = match issue_token(
        account.id,
        &account.role,
        &state.config.jwt_secret,
        state.config.session_ttl(),
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("token issuance failed after oauth: {}", e);
            return Ok(failure_redirect(frontend_url).into_response());
        }
    };

    tracing::info!("account {} authenticated via google", account.id);

    Ok(Redirect::to(&format!(
        "{}/auth/google/callback?token={}",
        frontend_url, token
    ))
    .into_response())
}
