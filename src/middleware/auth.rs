/**
 * Authentication Gateway
 *
 * Middleware protecting routes that require a verified session. It
 * extracts a session token from the `Authorization: Bearer` header or,
 * failing that, from the session cookie; validates it; re-resolves the
 * subject against the credential store; and attaches the resolved
 * identity to the request for downstream handlers.
 *
 * # Security
 *
 * - Every failure is the same uniform 401: missing token, bad signature,
 *   expired token, and unknown subject are indistinguishable to the
 *   caller.
 * - The subject is re-resolved on every request - an account deleted or
 *   altered after token issuance is reflected immediately.
 * - The attached identity never includes the password hash.
 */

use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::accounts::{self, Account};
use crate::auth::sessions::{token_subject, SESSION_COOKIE};
use crate::error::AuthError;
use crate::server::state::AppState;

/// Resolved identity attached to authenticated requests
///
/// A safe projection of the account; the password hash stays behind the
/// store boundary.
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl From<Account> for CurrentAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            role: account.role,
        }
    }
}

/// Pull a session token from the bearer header or the session cookie
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then(|| value.to_string())
            })
        })
}

/// Authentication middleware
///
/// 1. Extract the token (bearer header, then cookie)
/// 2. Validate signature and expiry
/// 3. Resolve the subject id to a current account
/// 4. Attach `CurrentAccount` to request extensions
///
/// Returns the uniform 401 on any failure.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        tracing::warn!("request to protected route without a session token");
        AuthError::unauthorized("Not authorized to access this resource")
    })?;

    let subject = token_subject(&token, &state.config.jwt_secret)?;

    let account = accounts::find_by_id(&state.pool, subject)
        .await?
        .ok_or_else(|| {
            tracing::warn!("session token subject {} no longer resolves", subject);
            AuthError::unauthorized("Not authorized to access this resource")
        })?;

    request.extensions_mut().insert(CurrentAccount::from(account));

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated account
///
/// Usable as a handler parameter on any route behind `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthAccount(pub CurrentAccount);

impl axum::extract::FromRequestParts<AppState> for AuthAccount {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("CurrentAccount missing from request extensions");
                AuthError::unauthorized("Not authorized to access this resource")
            })?;

        Ok(AuthAccount(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(COOKIE, HeaderValue::from_static("token=def"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=def; lang=en"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("def"));
    }

    #[test]
    fn test_extract_token_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("nottoken=def"));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_extract_token_missing() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
