//! PKCE (RFC 7636) code verifier and challenge generation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the code verifier in characters.
const VERIFIER_LENGTH: usize = 128;

/// Alphabet the verifier is sampled from.
const VERIFIER_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// PKCE code verifier and challenge pair.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a new pair with a fresh random verifier.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let verifier: String = (0..VERIFIER_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..VERIFIER_CHARSET.len());
                VERIFIER_CHARSET[idx] as char
            })
            .collect();
        let challenge = challenge_for(&verifier);

        Self { verifier, challenge }
    }

    /// Check that `verifier` hashes to `challenge` under the S256 transform.
    pub fn verify(verifier: &str, challenge: &str) -> bool {
        challenge_for(verifier) == challenge
    }
}

/// Compute the S256 code challenge for a verifier:
/// base64url-without-padding of the verifier's SHA-256 digest.
pub fn challenge_for(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
