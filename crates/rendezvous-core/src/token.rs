//! Opaque token generation.
//!
//! In production, tokens come from the thread-local CSPRNG. In tests a
//! predictable sequence is injected.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

/// Number of random bytes behind every generated token.
pub const TOKEN_BYTES: usize = 32;

/// Source of unique, unguessable identifiers.
pub trait TokenGenerator: Send + Sync {
    /// Produce a fresh token.
    fn generate(&self) -> String;
}

/// Generates URL-safe base64 tokens from cryptographically secure randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
