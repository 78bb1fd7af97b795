//! Authenticated Encryption with Associated Data
//!
//! Uses AES-256-GCM.
//! Key size: 32 bytes.  IV: 12 bytes (random).  Tag: 16 bytes.
//!
//! The IV is returned separately from the ciphertext rather than prepended:
//! callers persist the two fields side by side (the wrapped-key record keeps
//! them under distinct preference keys).

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// GCM IV length in bytes (96-bit).
pub const IV_LEN: usize = 12;
/// Authentication tag length in bytes (128-bit).
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte key under a fresh random IV.
/// `aad` is additional associated data (authenticated but not encrypted).
pub fn encrypt(
    key: &[u8; 32],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<([u8; IV_LEN], Vec<u8>), CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::AeadEncrypt)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), Payload { msg: plaintext, aad })
        .map_err(|_| CryptoError::AeadEncrypt)?;

    Ok((iv, ciphertext))
}

/// Decrypt `ciphertext` sealed under `iv`.
///
/// Fails with [`CryptoError::AeadDecrypt`] when the tag does not
/// authenticate: wrong key, wrong IV, wrong AAD, or modified data. Never
/// returns unauthenticated plaintext.
pub fn decrypt(
    key: &[u8; 32],
    iv: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if iv.len() != IV_LEN || ciphertext.len() < TAG_LEN {
        return Err(CryptoError::AeadDecrypt);
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::AeadDecrypt)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), Payload { msg: ciphertext, aad })
        .map_err(|_| CryptoError::AeadDecrypt)?;

    Ok(Zeroizing::new(plaintext))
}
