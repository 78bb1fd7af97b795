//! mg_store - Encrypted local email history for Mail Guard
//!
//! # Encryption strategy
//! SQLite does NOT natively encrypt.  We use application-level encryption:
//! - Payload columns (email bodies, attachment bytes) are stored as
//!   AES-256-GCM ciphertext, base64-encoded.
//! - The store key is the random passphrase recovered by the key manager
//!   (wrapped at rest by the platform keystore) and is held in memory for
//!   the store's lifetime.
//! - Non-sensitive metadata (sender, subject, digests, status, timestamps)
//!   is stored in plaintext to allow efficient queries.
//!
//! # Migration
//! SQLx migrations in `migrations/` are run on open.

pub mod db;
pub mod emails;
pub mod error;
pub mod models;

pub use db::Store;
pub use error::StoreError;
