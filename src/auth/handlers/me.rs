/**
 * Current Account Handler
 *
 * GET /api/auth/me (protected)
 *
 * Returns the gateway-resolved account projection. The gateway already
 * re-resolved the subject against the store, so the identity here is
 * current, not merely whatever the token payload claimed.
 */

use axum::response::Json;

use crate::auth::handlers::types::{AccountResponse, ApiResponse};
use crate::error::AuthError;
use crate::middleware::AuthAccount;

/// Current account handler
pub async fn me(AuthAccount(account): AuthAccount) -> Result<Json<ApiResponse>, AuthError> {
    Ok(Json(ApiResponse::with_user(AccountResponse::from(
        &account,
    ))))
}
