//! Binary email envelope (protobuf wire format)
//!
//! An email file is a single `SecureEmail` protobuf message consumed as a
//! whole stream: sender metadata, subject, body, an optional image
//! attachment, and the two content digests recorded at authoring time.
//!
//! Proto3 semantics apply: a zero-length `attached_image` field means "no
//! attachment" and is normalised to `None` at the domain boundary.

use std::io::Read;

use chrono::{DateTime, Utc};
use prost::Message;

use crate::email::{Email, VerificationStatus};
use crate::error::ParseError;

/// Wire-format email envelope. Tags are fixed; the schema is versionless.
#[derive(Clone, PartialEq, Message)]
pub struct SecureEmail {
    #[prost(string, tag = "1")]
    pub sender_name: String,
    #[prost(string, tag = "2")]
    pub sender_email_address: String,
    #[prost(string, tag = "3")]
    pub subject: String,
    #[prost(string, tag = "4")]
    pub body: String,
    /// Raw image bytes; empty means no attachment.
    #[prost(bytes = "vec", tag = "5")]
    pub attached_image: Vec<u8>,
    #[prost(string, tag = "6")]
    pub body_hash: String,
    #[prost(string, tag = "7")]
    pub image_hash: String,
}

impl SecureEmail {
    /// Convert the wire representation into a fresh domain record.
    ///
    /// The record always starts in [`VerificationStatus::Pending`] with no
    /// id assigned yet.
    pub fn into_email(self, imported_at: DateTime<Utc>) -> Email {
        let attached_image = if self.attached_image.is_empty() {
            None
        } else {
            Some(self.attached_image)
        };
        Email {
            id: 0,
            sender_name: self.sender_name,
            sender_email: self.sender_email_address,
            subject: self.subject,
            body: self.body,
            attached_image,
            body_hash: self.body_hash,
            image_hash: self.image_hash,
            verification_status: VerificationStatus::Pending,
            imported_at,
        }
    }
}

/// Decode a `SecureEmail` from raw bytes.
pub fn decode_envelope(bytes: &[u8]) -> Result<SecureEmail, ParseError> {
    Ok(SecureEmail::decode(bytes)?)
}

/// Read a whole envelope stream and convert it to a domain [`Email`].
///
/// `imported_at` is supplied by the caller; the service layer passes the
/// wall clock at parse time. Stored hash strings are carried through
/// verbatim: a malformed expected hash is a verification failure later,
/// never a parse failure here.
pub fn parse_email<R: Read>(
    mut reader: R,
    imported_at: DateTime<Utc>,
) -> Result<Email, ParseError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let envelope = decode_envelope(&buf)?;
    Ok(envelope.into_email(imported_at))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use chrono::TimeZone;

    use super::*;

    fn sample_envelope() -> SecureEmail {
        SecureEmail {
            sender_name: "Mugisha Jean Claude".into(),
            sender_email_address: "mugisha.jc@qtglobal.rw".into(),
            subject: "Project Update".into(),
            body: "Hello".into(),
            attached_image: vec![1, 2, 3],
            body_hash: mg_crypto::hash::sha256_hex_text("Hello"),
            image_hash: mg_crypto::hash::sha256_hex(&[1, 2, 3]),
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn round_trip_through_wire_bytes() {
        let bytes = sample_envelope().encode_to_vec();
        let email = parse_email(&mut Cursor::new(bytes), ts()).unwrap();

        assert_eq!(email.id, 0);
        assert!(!email.is_saved());
        assert_eq!(email.sender_name, "Mugisha Jean Claude");
        assert_eq!(email.sender_email, "mugisha.jc@qtglobal.rw");
        assert_eq!(email.subject, "Project Update");
        assert_eq!(email.body, "Hello");
        assert_eq!(email.attached_image.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(email.verification_status, VerificationStatus::Pending);
        assert_eq!(email.imported_at, ts());
    }

    #[test]
    fn zero_length_image_normalises_to_none() {
        let mut envelope = sample_envelope();
        envelope.attached_image = Vec::new();
        envelope.image_hash = String::new();

        let bytes = envelope.encode_to_vec();
        let email = parse_email(&mut Cursor::new(bytes), ts()).unwrap();
        assert_eq!(email.attached_image, None);
        assert!(!email.has_attachment());
    }

    #[test]
    fn malformed_hash_strings_still_parse() {
        let mut envelope = sample_envelope();
        envelope.image_hash = "deadbeef".into();

        let bytes = envelope.encode_to_vec();
        let email = parse_email(&mut Cursor::new(bytes), ts()).unwrap();
        assert_eq!(email.image_hash, "deadbeef");
    }

    #[test]
    fn truncated_stream_is_a_decode_error() {
        let mut bytes = sample_envelope().encode_to_vec();
        bytes.truncate(bytes.len() - 1);

        match parse_email(&mut Cursor::new(bytes), ts()) {
            Err(ParseError::Decode(_)) => {}
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let bytes = vec![0xFF; 16];
        assert!(matches!(
            parse_email(&mut Cursor::new(bytes), ts()),
            Err(ParseError::Decode(_))
        ));
    }

    #[test]
    fn failing_reader_is_a_read_error() {
        struct BrokenReader;
        impl Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }

        assert!(matches!(
            parse_email(&mut BrokenReader, ts()),
            Err(ParseError::Read(_))
        ));
    }

    #[test]
    fn empty_stream_decodes_to_blank_envelope() {
        // Proto3 treats an empty buffer as a message with all defaults; the
        // blank record then fails verification downstream instead of
        // failing the parse.
        let email = parse_email(&mut Cursor::new(Vec::new()), ts()).unwrap();
        assert_eq!(email.body, "");
        assert_eq!(email.attached_image, None);
        assert_eq!(email.verification_status, VerificationStatus::Pending);
    }
}
