/**
 * Password Reset Token Primitives
 *
 * Generation and hashing for the single-use recovery tokens of the reset
 * flow. The plaintext token carries 20 bytes of entropy and only ever
 * leaves the process inside the reset email; the store keeps its SHA-256
 * digest. A fast digest is sufficient here because, unlike a password,
 * the token itself is full-entropy random.
 */

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a fresh reset token
///
/// Returns `(plaintext, digest)`: the hex-encoded plaintext destined for
/// the email link, and the SHA-256 hex digest destined for storage.
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; 20];
    rand::rng().fill_bytes(&mut bytes);

    let plaintext = hex::encode(bytes);
    let digest = hash_reset_token(&plaintext);
    (plaintext, digest)
}

/// Hash a plaintext reset token for storage or lookup
pub fn hash_reset_token(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let (plaintext, digest) = generate_reset_token();
        assert_eq!(plaintext.len(), 40);
        assert_eq!(digest.len(), 64);
        assert_ne!(plaintext, digest);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let (plaintext, digest) = generate_reset_token();
        assert_eq!(hash_reset_token(&plaintext), digest);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_reset_token();
        let (b, _) = generate_reset_token();
        assert_ne!(a, b);
    }
}
