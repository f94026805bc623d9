//! # Generate
//!
//! Random strings for use as pre-authorized codes, access tokens, state,
//! and nonces.
//!
//! Values are drawn from [`fastrand`], which is not cryptographically
//! secure. Deployments needing stronger unguessability should source these
//! values from a CSPRNG.

use base64ct::{Base64UrlUnpadded, Encoding};

const SAFE_CHARS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789)(*&^%$#@!~";
const TOKEN_LEN: usize = 32;

/// Generates a base64 encoded random string for a pre-authorized code.
#[must_use]
pub fn pre_auth_code() -> String {
    let rnd = random_string(TOKEN_LEN, SAFE_CHARS);
    Base64UrlUnpadded::encode_string(rnd.as_bytes())
}

/// Generates a base64 encoded random string for an access token.
#[must_use]
pub fn token() -> String {
    let rnd = random_string(TOKEN_LEN, SAFE_CHARS);
    Base64UrlUnpadded::encode_string(rnd.as_bytes())
}

/// Generates a base64 encoded random string for a nonce.
#[must_use]
pub fn nonce() -> String {
    let rnd = random_string(TOKEN_LEN, SAFE_CHARS);
    Base64UrlUnpadded::encode_string(rnd.as_bytes())
}

/// Generates a base64 encoded random string for a state key.
#[must_use]
pub fn state_key() -> String {
    let rnd = random_string(TOKEN_LEN, SAFE_CHARS);
    Base64UrlUnpadded::encode_string(rnd.as_bytes())
}

// Generates a random string from a given set of characters.
fn random_string(len: usize, charset: &str) -> String {
    let chars: Vec<char> = charset.chars().collect();
    (0..len).map(|_| chars[fastrand::usize(..chars.len())]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        assert_ne!(token(), token());
        assert_ne!(pre_auth_code(), pre_auth_code());
        assert_ne!(nonce(), nonce());
    }

    #[test]
    fn token_length() {
        // 32 random chars, base64url encoded without padding
        assert_eq!(token().len(), 43);
    }
}
