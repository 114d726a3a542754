//! Opaque single-use tokens.
//!
//! Used for email verification and password reset links. Unlike session
//! tokens these carry no decodable structure: validity is established only
//! by an exact store lookup, and expiry (where any) is tracked next to the
//! stored token, not inside it.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes per token. 32 bytes = 256 bits of entropy,
/// 64 hex characters on the wire.
pub const TOKEN_BYTES: usize = 32;

/// Generate a fresh opaque token from the OS CSPRNG, hex encoded.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate();

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        // 256 bits of entropy: a collision here means the RNG is broken
        let first = generate();
        let second = generate();
        assert_ne!(first, second);
    }
}
