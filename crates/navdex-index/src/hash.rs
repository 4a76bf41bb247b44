//! Content fingerprints.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of a page body.
///
/// Hex-encoded SHA-256, always 64 characters.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
