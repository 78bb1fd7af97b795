//! Database abstraction over SQLite via sqlx.

use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use zeroize::Zeroizing;

use mg_crypto::aead;

use crate::error::StoreError;

/// Domain separation for encrypted columns.
const COLUMN_AAD: &[u8] = b"mg-store-v1";

/// Central store handle.  Cheap to clone (Arc internally).
#[derive(Clone)]
pub struct Store {
    pub pool: SqlitePool,
    key: Arc<Zeroizing<[u8; 32]>>,
}

impl Store {
    /// Open (or create) the SQLite database at `db_path`, with payload
    /// columns keyed by `key` (the passphrase from the key manager).
    /// Runs all pending migrations automatically.
    ///
    /// WAL journal mode and foreign-key enforcement are configured at
    /// connection time, not inside a migration: SQLite refuses to change
    /// `journal_mode` inside a transaction and sqlx wraps every migration
    /// in one.
    pub async fn open(db_path: &Path, key: [u8; 32]) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        tracing::debug!(path = %db_path.display(), "email store open");

        Ok(Self {
            pool,
            key: Arc::new(Zeroizing::new(key)),
        })
    }

    /// Encrypt a payload column value (base64 of IV || ciphertext).
    pub fn encrypt_value(&self, plaintext: &[u8]) -> Result<String, StoreError> {
        let (iv, ciphertext) = aead::encrypt(&self.key, plaintext, COLUMN_AAD)?;
        let mut blob = Vec::with_capacity(iv.len() + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(blob))
    }

    /// Decrypt a payload column value.
    pub fn decrypt_value(&self, b64: &str) -> Result<Vec<u8>, StoreError> {
        let blob = general_purpose::URL_SAFE_NO_PAD
            .decode(b64)
            .map_err(|e| StoreError::Crypto(mg_crypto::CryptoError::Base64Decode(e)))?;
        if blob.len() < aead::IV_LEN {
            return Err(StoreError::Crypto(mg_crypto::CryptoError::AeadDecrypt));
        }
        let (iv, ciphertext) = blob.split_at(aead::IV_LEN);
        let plaintext = aead::decrypt(&self.key, iv, ciphertext, COLUMN_AAD)?;
        Ok(plaintext.to_vec())
    }
}
