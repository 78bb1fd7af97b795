//! JSON preference file backing the key manager.
//!
//! A handful of string entries, read-mostly, written once when the store key
//! is first wrapped. The values kept here are ciphertext and IVs (base64),
//! so the file itself carries no secrets.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use mg_crypto::keywrap::KvStore;
use mg_crypto::CryptoError;

use crate::error::GuardError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsPayload {
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// File-backed [`KvStore`]. Every `put` flushes the whole map to disk.
pub struct PrefsFile {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl PrefsFile {
    /// Load `path`, or start empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, GuardError> {
        let entries = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice::<PrefsPayload>(&bytes)?.entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self) -> Result<(), GuardError> {
        let payload = PrefsPayload {
            entries: self.entries.read().clone(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&payload)?)?;
        Ok(())
    }
}

impl KvStore for PrefsFile {
    fn get(&self, key: &str) -> Result<Option<String>, CryptoError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), CryptoError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        self.persist()
            .map_err(|err| CryptoError::PrefStore(err.to_string()))
    }
}
