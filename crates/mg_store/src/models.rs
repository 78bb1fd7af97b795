//! Database row models - these map to/from SQL rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row shape of the `emails` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmailRow {
    pub id: i64,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    /// Encrypted body (base64 of IV || ciphertext).
    pub body_enc: String,
    /// Encrypted attachment bytes; NULL when the email has none.
    pub attached_image_enc: Option<String>,
    pub body_hash: String,
    pub image_hash: String,
    /// VerificationStatus storage name; unknown values map back to PENDING.
    pub verification_status: String,
    pub imported_at: DateTime<Utc>,
}
