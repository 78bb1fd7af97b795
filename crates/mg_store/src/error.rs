use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] mg_crypto::CryptoError),

    #[error("Email not found: {0}")]
    NotFound(i64),

    #[error("Corrupted row data: {0}")]
    Corrupted(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
