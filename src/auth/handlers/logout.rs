/**
 * Logout Handler
 *
 * POST /api/auth/logout (protected)
 *
 * Session tokens are stateless, so logout cannot revoke anything
 * server-side. The response instructs the client to overwrite its
 * session cookie with an already-expired placeholder; any previously
 * issued token stays valid until its natural expiry. From the client's
 * perspective this always succeeds.
 */

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::auth::handlers::types::ApiResponse;
use crate::auth::sessions::expired_session_cookie;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Logout handler
pub async fn logout(State(state): State<AppState>) -> Result<Response, AuthError> {
    let cookie = expired_session_cookie(state.config.secure_cookies);

    let mut response = (
        StatusCode::OK,
        Json(ApiResponse::with_message("Logged out successfully")),
    )
        .into_response();

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => {
            tracing::error!("failed to encode logout cookie: {:?}", e);
        }
    }

    Ok(response)
}
