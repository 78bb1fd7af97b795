//! Hardware-backed master-key storage
//!
//! The master key that wraps the store passphrase lives in the platform
//! credential store and is only ever handled through the opaque
//! [`MasterKey`] type; raw key bytes never appear in a public signature.
//!
//! Implementations:
//! - [`OsKeyring`]      - OS credential store via the `keyring` crate
//! - [`MemoryKeystore`] - in-memory fake for tests

use std::collections::HashMap;

use base64::{engine::general_purpose, Engine as _};
use keyring::Entry;
use parking_lot::RwLock;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::aead;
use crate::error::CryptoError;

/// Keyring service name under which master keys are filed.
pub const SERVICE_NAME: &str = "MailGuard";

/// Domain separation for passphrase wrapping.
const WRAP_AAD: &[u8] = b"mg-passphrase-wrap-v1";

/// Requested master-key configuration.
///
/// The wrapping scheme is fixed: AES-256 under GCM (GCM takes no padding).
/// [`Keystore::generate`] rejects any other combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub algorithm: KeyAlgorithm,
    pub size_bits: u32,
    pub block_mode: BlockMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Aes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    Gcm,
}

impl KeySpec {
    /// The only spec the passphrase wrapper uses.
    pub fn aes_256_gcm() -> Self {
        Self {
            algorithm: KeyAlgorithm::Aes,
            size_bits: 256,
            block_mode: BlockMode::Gcm,
        }
    }

    fn validate(&self) -> Result<(), CryptoError> {
        if *self != Self::aes_256_gcm() {
            return Err(CryptoError::UnsupportedKeySpec(format!("{self:?}")));
        }
        Ok(())
    }
}

/// A secret sealed under a master key. IV and ciphertext travel separately;
/// both persist as base64 strings under distinct preference keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub iv: [u8; aead::IV_LEN],
    pub ciphertext: Vec<u8>,
}

impl WrappedKey {
    /// `(ciphertext_b64, iv_b64)` for persistence.
    pub fn to_base64(&self) -> (String, String) {
        (
            general_purpose::STANDARD.encode(&self.ciphertext),
            general_purpose::STANDARD.encode(self.iv),
        )
    }

    /// Rebuild from the two persisted strings.
    pub fn from_base64(ciphertext_b64: &str, iv_b64: &str) -> Result<Self, CryptoError> {
        let ciphertext = general_purpose::STANDARD.decode(ciphertext_b64)?;
        let iv_bytes = general_purpose::STANDARD.decode(iv_b64)?;
        let iv: [u8; aead::IV_LEN] = iv_bytes.as_slice().try_into().map_err(|_| {
            CryptoError::WrappedKeyCorrupted(format!(
                "IV is {} bytes, expected {}",
                iv_bytes.len(),
                aead::IV_LEN
            ))
        })?;
        Ok(Self { iv, ciphertext })
    }
}

/// Opaque handle to a keystore-resident AES-256 key.
///
/// Exposes wrap/unwrap only; the raw bytes stay private to this module.
pub struct MasterKey {
    key: Zeroizing<[u8; 32]>,
}

impl MasterKey {
    fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(bytes),
        }
    }

    fn generate_random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Seal `secret` under this key (AES-256-GCM, fresh IV, 128-bit tag).
    pub fn wrap(&self, secret: &[u8]) -> Result<WrappedKey, CryptoError> {
        let (iv, ciphertext) = aead::encrypt(&self.key, secret, WRAP_AAD)?;
        Ok(WrappedKey { iv, ciphertext })
    }

    /// Recover a secret sealed by [`wrap`](Self::wrap).
    ///
    /// Authentication failure means a different master key or a modified
    /// record; the caller must treat it as fatal, not regenerate.
    pub fn unwrap(&self, wrapped: &WrappedKey) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        aead::decrypt(&self.key, &wrapped.iv, &wrapped.ciphertext, WRAP_AAD)
    }
}

/// Narrow capability interface over the platform keystore.
pub trait Keystore: Send + Sync {
    /// Whether a key exists under `alias`.
    fn has(&self, alias: &str) -> Result<bool, CryptoError>;

    /// Load the key stored under `alias`.
    fn get(&self, alias: &str) -> Result<MasterKey, CryptoError>;

    /// Create and persist a fresh key under `alias`.
    fn generate(&self, alias: &str, spec: &KeySpec) -> Result<MasterKey, CryptoError>;
}

/// Master keys filed in the OS credential store (Keychain, Secret Service,
/// Windows Credential Manager).
pub struct OsKeyring {
    service: String,
}

impl OsKeyring {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, alias: &str) -> Result<Entry, CryptoError> {
        Entry::new(&self.service, alias)
            .map_err(|e| CryptoError::KeystoreUnavailable(format!("keyring init: {e}")))
    }
}

impl Default for OsKeyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Keystore for OsKeyring {
    fn has(&self, alias: &str) -> Result<bool, CryptoError> {
        match self.entry(alias)?.get_password() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(CryptoError::KeystoreUnavailable(format!("probe key: {e}"))),
        }
    }

    fn get(&self, alias: &str) -> Result<MasterKey, CryptoError> {
        let encoded = self.entry(alias)?.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => CryptoError::KeyNotFound(alias.to_string()),
            other => CryptoError::KeystoreUnavailable(format!("load key: {other}")),
        })?;
        let bytes = general_purpose::STANDARD.decode(encoded)?;
        let key: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("master key wrong length".into()))?;
        Ok(MasterKey::from_bytes(key))
    }

    fn generate(&self, alias: &str, spec: &KeySpec) -> Result<MasterKey, CryptoError> {
        spec.validate()?;
        let key = MasterKey::generate_random();
        let encoded = general_purpose::STANDARD.encode(&*key.key);
        self.entry(alias)?
            .set_password(&encoded)
            .map_err(|e| CryptoError::KeyGeneration(format!("persist key: {e}")))?;
        Ok(key)
    }
}

/// In-memory keystore for tests. Keys live in a map; nothing touches the OS.
#[derive(Default)]
pub struct MemoryKeystore {
    keys: RwLock<HashMap<String, [u8; 32]>>,
}

impl MemoryKeystore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Keystore for MemoryKeystore {
    fn has(&self, alias: &str) -> Result<bool, CryptoError> {
        Ok(self.keys.read().contains_key(alias))
    }

    fn get(&self, alias: &str) -> Result<MasterKey, CryptoError> {
        self.keys
            .read()
            .get(alias)
            .copied()
            .map(MasterKey::from_bytes)
            .ok_or_else(|| CryptoError::KeyNotFound(alias.to_string()))
    }

    fn generate(&self, alias: &str, spec: &KeySpec) -> Result<MasterKey, CryptoError> {
        spec.validate()?;
        let key = MasterKey::generate_random();
        self.keys.write().insert(alias.to_string(), *key.key);
        Ok(key)
    }
}
