//! mg_crypto - Mail Guard cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Raw master-key bytes never cross a public API boundary.
//!
//! # Module layout
//! - `hash`     - SHA-256 content digests (lowercase hex)
//! - `aead`     - AES-256-GCM encrypt/decrypt helpers
//! - `keystore` - hardware-backed master keys behind a narrow trait
//! - `keywrap`  - store-passphrase generation, wrapping and recovery
//! - `error`    - unified error type

pub mod aead;
pub mod error;
pub mod hash;
pub mod keystore;
pub mod keywrap;

pub use error::CryptoError;
