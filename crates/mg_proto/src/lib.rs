//! mg_proto - Mail Guard wire and domain types
//!
//! # Module layout
//! - `email`    - the Email record and its verification status
//! - `envelope` - protobuf `SecureEmail` wire format and stream parsing
//! - `verify`   - SHA-256 integrity verification
//! - `image`    - attachment signature sniffing
//! - `error`    - parse error type

pub mod email;
pub mod envelope;
pub mod error;
pub mod image;
pub mod verify;

pub use email::{Email, VerificationStatus};
pub use envelope::{parse_email, SecureEmail};
pub use error::ParseError;
pub use verify::{verify_email, VerificationResult};
