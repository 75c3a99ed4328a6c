/**
 * Password Hashing Service
 *
 * One-way salted hashing and verification for local credentials.
 *
 * # Contract
 *
 * - `hash_password` produces a salted bcrypt digest; hashing the same
 *   plaintext twice yields different digests, both of which verify.
 * - `verify_password` runs bcrypt's constant-time comparison and returns
 *   `false` for any malformed stored digest instead of erroring, so a
 *   corrupt hash denies authentication rather than crashing the caller.
 *
 * # Execution
 *
 * bcrypt is CPU-bound by design. Both operations run on the blocking
 * thread pool via `tokio::task::spawn_blocking` so one hashing call
 * cannot stall unrelated request processing.
 */

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a plaintext password with a fresh salt
///
/// # Errors
///
/// Returns `AuthError::Server` if bcrypt fails or the blocking task is
/// cancelled; the plaintext is never included in the error.
pub async fn hash_password(plaintext: String) -> Result<String, AuthError> {
    let digest = tokio::task::spawn_blocking(move || hash(plaintext, DEFAULT_COST))
        .await
        .map_err(|e| {
            tracing::error!("password hashing task failed: {:?}", e);
            AuthError::server("Server error. Please try again later.")
        })?
        .map_err(|e| {
            tracing::error!("bcrypt hash failed: {:?}", e);
            AuthError::server("Server error. Please try again later.")
        })?;

    Ok(digest)
}

/// Verify a plaintext password against a stored digest
///
/// A malformed digest verifies to `false`; only executor failures are
/// surfaced as errors.
pub async fn verify_password(plaintext: String, digest: String) -> Result<bool, AuthError> {
    let matched = tokio::task::spawn_blocking(move || verify(plaintext, &digest))
        .await
        .map_err(|e| {
            tracing::error!("password verification task failed: {:?}", e);
            AuthError::server("Server error. Please try again later.")
        })?
        .unwrap_or(false);

    Ok(matched)
}
