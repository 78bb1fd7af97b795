use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Key not found in keystore: {0}")]
    KeyNotFound(String),

    #[error("Keystore unavailable: {0}")]
    KeystoreUnavailable(String),

    #[error("Unsupported key spec: {0}")]
    UnsupportedKeySpec(String),

    #[error("AEAD encryption failed")]
    AeadEncrypt,

    #[error("AEAD decryption failed (authentication tag mismatch)")]
    AeadDecrypt,

    #[error("Wrapped key record corrupted: {0}")]
    WrappedKeyCorrupted(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Preference store error: {0}")]
    PrefStore(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
