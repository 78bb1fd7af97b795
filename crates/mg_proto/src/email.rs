//! Domain email record and its verification status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parsed email together with the integrity digests recorded at authoring
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    /// Store-assigned row id; 0 until first save.
    pub id: i64,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    /// Raw attachment bytes; `None` is a valid state, not an error.
    pub attached_image: Option<Vec<u8>>,
    /// Expected SHA-256 of the body (hex).
    pub body_hash: String,
    /// Expected SHA-256 of the attachment (hex); empty when none was
    /// attached.
    pub image_hash: String,
    pub verification_status: VerificationStatus,
    /// Set once when the record is created; never mutated afterwards.
    pub imported_at: DateTime<Utc>,
}

impl Email {
    pub fn is_saved(&self) -> bool {
        self.id != 0
    }

    pub fn has_attachment(&self) -> bool {
        self.attached_image.is_some()
    }
}

/// Lifecycle status of an imported email.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Parsed but not yet verified.
    #[default]
    Pending,
    /// Body and attachment digests both matched.
    Verified,
    /// At least one digest did not match.
    VerificationFailed,
}

impl VerificationStatus {
    /// Canonical storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::VerificationFailed => "VERIFICATION_FAILED",
        }
    }

    /// Map a stored name back; unknown values fall back to `Pending`.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "VERIFIED" => Self::Verified,
            "VERIFICATION_FAILED" => Self::VerificationFailed,
            _ => Self::Pending,
        }
    }
}
