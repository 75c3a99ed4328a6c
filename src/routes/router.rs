/**
 * Router Configuration
 *
 * Assembles the route table. Unauthenticated entry points (register,
 * login, forgot/reset password, the OAuth pair) are mounted directly;
 * protected operations sit behind the authentication gateway via
 * `route_layer`, so the middleware runs only where a verified session is
 * required.
 */

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::handlers::{
    forgot_password, google_callback, google_start, login, logout, me, register,
    reset_password, update_password,
};
use crate::middleware::require_auth;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// ## Public
/// - `POST /api/auth/register` - registration
/// - `POST /api/auth/login` - login
/// - `POST /api/auth/forgotpassword` - reset request
/// - `PUT  /api/auth/resetpassword/{token}` - reset consumption
/// - `GET  /api/auth/google` - OAuth consent redirect
/// - `GET  /api/auth/google/callback` - OAuth completion
///
/// ## Protected (authentication gateway)
/// - `GET  /api/auth/me` - current account
/// - `POST /api/auth/logout` - clear the session cookie
/// - `PUT  /api/auth/updatepassword` - change password
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgotpassword", post(forgot_password))
        .route("/api/auth/resetpassword/{token}", put(reset_password))
        .route("/api/auth/google", get(google_start))
        .route("/api/auth/google/callback", get(google_callback));

    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/updatepassword", put(update_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Fallback handler rendering the uniform envelope for unknown routes
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Not found",
        })),
    )
}
