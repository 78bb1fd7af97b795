//! Built-in sample envelope, for exercising the pipeline without a real
//! sender. Hashes are computed from the actual content, so the generated
//! file verifies end to end.

use std::path::{Path, PathBuf};

use prost::Message;

use mg_crypto::hash;
use mg_proto::SecureEmail;

use crate::error::GuardError;
use crate::paths::SAMPLE_FILE;

/// 1x1 PNG. Small, but a real image: signature, IHDR, IDAT, IEND.
pub const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15,
    0xC4, 0x89, //
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, //
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND
    0xAE, 0x42, 0x60, 0x82,
];

/// Build the well-formed sample envelope.
pub fn sample_envelope() -> SecureEmail {
    let body = sample_body();
    let body_hash = hash::sha256_hex_text(&body);
    let image_hash = hash::sha256_hex(SAMPLE_PNG);

    SecureEmail {
        sender_name: "Mugisha Jean Claude".to_string(),
        sender_email_address: "mugisha.jc@qtglobal.rw".to_string(),
        subject: "Project Update - Mail Guard Development".to_string(),
        body,
        attached_image: SAMPLE_PNG.to_vec(),
        body_hash,
        image_hash,
    }
}

/// Encode the sample envelope and write it into `dir` as a `.pb` file,
/// returning the full path.
pub fn write_sample_file(dir: &Path) -> Result<PathBuf, GuardError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(SAMPLE_FILE);
    std::fs::write(&path, sample_envelope().encode_to_vec())?;
    tracing::debug!(path = %path.display(), "sample envelope written");
    Ok(path)
}

fn sample_body() -> String {
    [
        "Muraho,",
        "",
        "I hope this message finds you well. Here is the latest on the Mail Guard development effort.",
        "",
        "Key milestones achieved:",
        "- Binary envelope parsing over Protocol Buffers",
        "- SHA-256 integrity verification of body and attachments",
        "- Encrypted local history protected by a wrapped store key",
        "",
        "The application now verifies each message by comparing SHA-256 digests of the body and the attached image against the values recorded when the message was authored.",
        "",
        "Please review the attached diagram showing the verification flow.",
        "",
        "Murakoze,",
        "Mugisha Jean Claude",
        "QT Global Software Ltd",
        "Kigali, Rwanda",
    ]
    .join("\n")
}
