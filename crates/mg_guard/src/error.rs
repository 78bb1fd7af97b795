//! Service-level error type.

use mg_crypto::CryptoError;
use mg_proto::ParseError;
use mg_store::StoreError;
use thiserror::Error;

/// Everything that can go wrong between opening the subsystem and reading
/// back history. Parse and I/O failures are recoverable per record; key
/// management failures are fatal for the whole store.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Key management error: {0}")]
    Key(#[from] CryptoError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Preference file error: {0}")]
    Prefs(#[from] serde_json::Error),

    #[error("Cannot determine a data directory on this platform")]
    NoDataDir,
}
