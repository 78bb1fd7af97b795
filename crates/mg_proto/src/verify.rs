//! Integrity verification
//!
//! Recomputes SHA-256 digests over the parsed content and compares them to
//! the digests recorded in the envelope. Comparison is ASCII
//! case-insensitive, so an envelope authored with uppercase hex still
//! verifies.

use serde::{Deserialize, Serialize};

use mg_crypto::hash::{sha256_hex, sha256_hex_text};

use crate::email::{Email, VerificationStatus};

/// Outcome of verifying one email. Computed on demand, never persisted;
/// expected digests are carried through for display and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_body_verified: bool,
    pub is_image_verified: bool,
    pub computed_body_hash: String,
    /// Empty when the email has no attachment.
    pub computed_image_hash: String,
    pub expected_body_hash: String,
    pub expected_image_hash: String,
}

impl VerificationResult {
    /// Status the record should carry after this verification.
    pub fn overall_status(&self) -> VerificationStatus {
        if self.is_fully_verified() {
            VerificationStatus::Verified
        } else {
            VerificationStatus::VerificationFailed
        }
    }

    pub fn is_fully_verified(&self) -> bool {
        self.is_body_verified && self.is_image_verified
    }
}

/// Verify `email` against its stored digests. Pure: no I/O, no mutation.
///
/// The image rule: a missing attachment with an empty expected digest is
/// trivially verified; every other combination compares the recomputed
/// digest (empty when no attachment) against the stored one. An attachment
/// whose expected digest is empty therefore always fails.
pub fn verify_email(email: &Email) -> VerificationResult {
    let computed_body_hash = sha256_hex_text(&email.body);
    let computed_image_hash = email
        .attached_image
        .as_deref()
        .map(sha256_hex)
        .unwrap_or_default();

    let is_body_verified = computed_body_hash.eq_ignore_ascii_case(&email.body_hash);
    let is_image_verified = if email.attached_image.is_none() && email.image_hash.is_empty() {
        true
    } else {
        computed_image_hash.eq_ignore_ascii_case(&email.image_hash)
    };

    VerificationResult {
        is_body_verified,
        is_image_verified,
        computed_body_hash,
        computed_image_hash,
        expected_body_hash: email.body_hash.clone(),
        expected_image_hash: email.image_hash.clone(),
    }
}
