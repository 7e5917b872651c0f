//! API token generation and hashing.
//!
//! Raw tokens are shown once at issue time; only their SHA-256 digest is
//! persisted, so a leaked database dump cannot be replayed as credentials.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "cr";

/// Generate a fresh raw API token.
#[must_use]
pub fn generate_api_token() -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}{}",
        Uuid::now_v7().simple(),
        Uuid::now_v7().simple()
    )
}

/// Hash a raw API token into its stored lookup form.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
