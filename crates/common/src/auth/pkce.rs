//! PKCE (Proof Key for Code Exchange) for the authorization-code flow
//!
//! Implements RFC 7636 with the S256 method. The identity provider is a
//! public client, so the verifier replaces a client secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge method sent with every authorization request
pub const CHALLENGE_METHOD: &str = "S256";

/// 32 random bytes, base64url without padding (43 characters).
fn random_token() -> String {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compute `BASE64URL(SHA256(verifier))`.
#[must_use]
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Verifier, challenge and CSRF state for one pending authorization
///
/// Kept by the session between `generate_authorization_url` and
/// `complete_from_redirect`; consumed by the latter.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Secret sent only during the code exchange
    pub code_verifier: String,
    /// SHA-256 of the verifier, sent in the authorization URL
    pub code_challenge: String,
    /// Echoed back by the provider in the redirect
    pub state: String,
}

impl PkceChallenge {
    /// Fresh random verifier and state.
    ///
    /// # Examples
    /// ```
    /// use crewconnect_common::auth::pkce::PkceChallenge;
    ///
    /// let challenge = PkceChallenge::generate();
    /// assert_eq!(challenge.code_verifier.len(), 43);
    /// assert_ne!(challenge.code_verifier, challenge.state);
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = random_token();
        let code_challenge = code_challenge(&code_verifier);
        Self { code_verifier, code_challenge, state: random_token() }
    }

    /// True when `received` is the state this challenge was issued with.
    #[must_use]
    pub fn matches_state(&self, received: &str) -> bool {
        self.state == received
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::pkce.
    use super::*;

    /// Validates `PkceChallenge::generate` output length and alphabet.
    ///
    /// Assertions:
    /// - Verifier length sits within the RFC 7636 43-128 range.
    /// - No value contains padding or the non-URL-safe `+` and `/`.
    #[test]
    fn test_generated_values_are_base64url() {
        let challenge = PkceChallenge::generate();

        assert!((43..=128).contains(&challenge.code_verifier.len()));
        for value in [&challenge.code_verifier, &challenge.code_challenge, &challenge.state] {
            assert!(!value.contains('='));
            assert!(!value.contains('+'));
            assert!(!value.contains('/'));
        }
    }

    /// Validates that two generations never share values.
    #[test]
    fn test_unique_challenges() {
        let first = PkceChallenge::generate();
        let second = PkceChallenge::generate();

        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.state, second.state);
    }

    /// Validates the challenge is recomputable from the verifier.
    ///
    /// Assertions:
    /// - `code_challenge(verifier)` equals the stored challenge.
    /// - A different verifier yields a different challenge.
    #[test]
    fn test_challenge_derives_from_verifier() {
        let challenge = PkceChallenge::generate();

        assert_eq!(code_challenge(&challenge.code_verifier), challenge.code_challenge);
        assert_ne!(code_challenge("another-verifier"), challenge.code_challenge);
    }

    #[test]
    fn test_state_match() {
        let challenge = PkceChallenge::generate();
        let state = challenge.state.clone();

        assert!(challenge.matches_state(&state));
        assert!(!challenge.matches_state("forged"));
    }
}
