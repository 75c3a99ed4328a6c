/**
 * Session Token Issuer
 *
 * Mints and validates the signed, time-limited bearer tokens that carry a
 * session. Tokens are stateless JWTs; no server-side session table exists,
 * so validity is entirely a function of signature and expiry.
 *
 * # Claims
 *
 * - `sub` - account id (UUID)
 * - `role` - opaque role label, passed through for downstream use
 * - `iat` - issuance timestamp (Unix seconds)
 * - `exp` - expiry timestamp (Unix seconds)
 *
 * # Delivery
 *
 * The same token is returned in the response envelope and as a session
 * cookie (`HttpOnly; SameSite=Strict`, plus `Secure` in production), so a
 * programmatic client can use the bearer header while a browser rides the
 * cookie. Logout overwrites the cookie with an expired placeholder; any
 * previously issued token stays cryptographically valid until its natural
 * expiry.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Opaque role label
    pub role: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Create a session token for an account
///
/// The expiry is the configured lifetime from now. Signing uses the
/// server-held secret from `AppConfig`.
pub fn issue_token(
    account_id: Uuid,
    role: &str,
    secret: &str,
    lifetime: Duration,
) -> Result<String, AuthError> {
    issue_token_at(account_id, role, secret, lifetime, Utc::now())
}

/// Create a session token with an explicit issuance timestamp
///
/// Expiry tests use this to mint tokens whose lifetime has already
/// elapsed.
pub fn issue_token_at(
    account_id: Uuid,
    role: &str,
    secret: &str,
    lifetime: Duration,
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = Claims {
        sub: account_id.to_string(),
        role: role.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + lifetime).timestamp(),
    };

    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &key).map_err(|e| {
        tracing::error!("failed to sign session token: {:?}", e);
        AuthError::server("Server error. Please try again later.")
    })
}

/// Verify and decode a session token
///
/// The signature check comes first; the payload is never inspected on a
/// signature failure. Expiry is then enforced. Both checks are mandatory
/// and both failures collapse into the same uniform `Unauthorized`, so the
/// caller cannot distinguish malformed from expired.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::warn!("session token rejected: {:?}", e.kind());
        AuthError::unauthorized("Not authorized to access this resource")
    })?;

    Ok(data.claims)
}

/// Extract the subject account id from a validated token
pub fn token_subject(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let claims = validate_token(token, secret)?;
    Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("session token carried a non-UUID subject: {:?}", e);
        AuthError::unauthorized("Not authorized to access this resource")
    })
}

/// Build the `Set-Cookie` value that delivers a session token
pub fn session_cookie(token: &str, lifetime: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        SESSION_COOKIE,
        token,
        lifetime.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the expired `Set-Cookie` placeholder used by logout
pub fn expired_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=none; Path=/; Max-Age=0; HttpOnly; SameSite=Strict",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
