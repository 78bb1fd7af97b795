//! SHA-256 content digests
//!
//! Digests are rendered as 64-character lowercase hex. Comparison against
//! stored digests happens at the verification layer and is case-insensitive
//! there; this module always emits lowercase.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`, hex-encoded.
///
/// Total and deterministic; the empty input hashes to the well-known
/// `e3b0c442...` digest rather than erroring.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// SHA-256 digest of the UTF-8 bytes of `text`.
pub fn sha256_hex_text(text: &str) -> String {
    sha256_hex(text.as_bytes())
}
