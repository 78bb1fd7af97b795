//! Envelope encryption for the store passphrase
//!
//! The local store is encrypted with a random 32-byte passphrase that never
//! touches disk in the clear: it is wrapped (AES-256-GCM) by a master key
//! resident in the platform keystore, and the resulting ciphertext and IV
//! are kept base64-encoded in the preference store under two fixed keys.
//!
//! Recovery rules are strict. A half-present record (ciphertext without IV,
//! or the reverse) and an unwrap failure are both fatal: regenerating the
//! passphrase would orphan every record encrypted under the old one.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keystore::{KeySpec, Keystore, WrappedKey};

/// Alias of the wrapping master key in the platform keystore.
pub const MASTER_KEY_ALIAS: &str = "mailguard_store_key";
/// Preference key holding the base64 wrapped passphrase.
pub const PREF_WRAPPED_KEY: &str = "encrypted_store_key";
/// Preference key holding the base64 GCM IV.
pub const PREF_KEY_IV: &str = "store_key_iv";

/// Passphrase length in bytes (AES-256 key size).
pub const PASSPHRASE_LEN: usize = 32;

/// Minimal key-value persistence needed by the key manager. Implemented by
/// the service-layer preference file.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CryptoError>;
    fn put(&self, key: &str, value: &str) -> Result<(), CryptoError>;
}

/// Creates and recovers the store passphrase.
pub struct KeyManager {
    keystore: Arc<dyn Keystore>,
    prefs: Arc<dyn KvStore>,
    // Serialises the whole get-or-create sequence; two concurrent callers
    // must never both generate.
    init_lock: Mutex<()>,
}

impl KeyManager {
    pub fn new(keystore: Arc<dyn Keystore>, prefs: Arc<dyn KvStore>) -> Self {
        Self {
            keystore,
            prefs,
            init_lock: Mutex::new(()),
        }
    }

    /// Return the store passphrase, creating and wrapping it on first run.
    ///
    /// Idempotent: every later call, in this process or the next, recovers
    /// the identical bytes. The plaintext passphrase never reaches the
    /// preference store.
    pub fn get_or_create_passphrase(
        &self,
    ) -> Result<Zeroizing<[u8; PASSPHRASE_LEN]>, CryptoError> {
        let _guard = self.init_lock.lock();

        let ciphertext = self.prefs.get(PREF_WRAPPED_KEY)?;
        let iv = self.prefs.get(PREF_KEY_IV)?;

        match (ciphertext, iv) {
            (Some(ct), Some(iv)) => self.recover(&ct, &iv),
            (None, None) => self.create(),
            _ => Err(CryptoError::WrappedKeyCorrupted(
                "one of wrapped key / IV is missing".into(),
            )),
        }
    }

    fn recover(
        &self,
        ciphertext_b64: &str,
        iv_b64: &str,
    ) -> Result<Zeroizing<[u8; PASSPHRASE_LEN]>, CryptoError> {
        let wrapped = WrappedKey::from_base64(ciphertext_b64, iv_b64)?;
        let master = self.keystore.get(MASTER_KEY_ALIAS)?;
        let plaintext = master.unwrap(&wrapped)?;

        let passphrase: [u8; PASSPHRASE_LEN] = plaintext
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("unwrapped passphrase wrong length".into()))?;
        Ok(Zeroizing::new(passphrase))
    }

    fn create(&self) -> Result<Zeroizing<[u8; PASSPHRASE_LEN]>, CryptoError> {
        let mut bytes = [0u8; PASSPHRASE_LEN];
        OsRng.fill_bytes(&mut bytes);
        let passphrase = Zeroizing::new(bytes);

        let master = if self.keystore.has(MASTER_KEY_ALIAS)? {
            self.keystore.get(MASTER_KEY_ALIAS)?
        } else {
            self.keystore
                .generate(MASTER_KEY_ALIAS, &KeySpec::aes_256_gcm())?
        };

        let wrapped = master.wrap(&*passphrase)?;
        let (ct_b64, iv_b64) = wrapped.to_base64();
        self.prefs.put(PREF_WRAPPED_KEY, &ct_b64)?;
        self.prefs.put(PREF_KEY_IV, &iv_b64)?;

        Ok(passphrase)
    }
}
