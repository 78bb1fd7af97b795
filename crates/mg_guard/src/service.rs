//! The Mail Guard service: one initialization path, one import pipeline.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use mg_crypto::keystore::{Keystore, OsKeyring};
use mg_crypto::keywrap::KeyManager;
use mg_proto::image::{detect_format, ImageFormat};
use mg_proto::{parse_email, verify_email, Email, VerificationResult, VerificationStatus};
use mg_store::{Store, StoreError};

use crate::error::GuardError;
use crate::paths::{DB_FILE, PREFS_FILE};
use crate::prefs::PrefsFile;

/// Outcome of one import: the record as it ended up, the verdict, and any
/// persistence failure. The verdict is final before the save is attempted,
/// so a record that could not be saved is still fully reportable.
#[derive(Debug)]
pub struct ImportOutcome {
    pub email: Email,
    pub verification: VerificationResult,
    pub persist_error: Option<StoreError>,
}

impl ImportOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none() && self.email.is_saved()
    }
}

/// A stored email re-selected from history, with a fresh verdict for display.
#[derive(Debug)]
pub struct OpenedEmail {
    pub email: Email,
    pub verification: VerificationResult,
}

impl OpenedEmail {
    /// Sniffed format of the attachment, when one is present.
    pub fn attachment_format(&self) -> Option<ImageFormat> {
        self.email.attached_image.as_deref().and_then(detect_format)
    }
}

/// Handle over the initialized subsystem. Cheap to clone.
#[derive(Clone)]
pub struct MailGuard {
    store: Store,
}

impl std::fmt::Debug for MailGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailGuard").finish_non_exhaustive()
    }
}

impl MailGuard {
    /// Open against the platform credential store.
    pub async fn open(data_dir: &Path) -> Result<Self, GuardError> {
        Self::open_with_keystore(data_dir, Arc::new(OsKeyring::new())).await
    }

    /// Open with a caller-supplied keystore. This is the single composition
    /// point: preference file, then the key manager, then the encrypted
    /// store. Key material problems surface here, before any record I/O.
    pub async fn open_with_keystore(
        data_dir: &Path,
        keystore: Arc<dyn Keystore>,
    ) -> Result<Self, GuardError> {
        std::fs::create_dir_all(data_dir)?;

        let prefs = Arc::new(PrefsFile::load(&data_dir.join(PREFS_FILE))?);
        let keys = KeyManager::new(keystore, prefs);
        let store_key = keys.get_or_create_passphrase()?;
        let store = Store::open(&data_dir.join(DB_FILE), *store_key).await?;

        tracing::info!(dir = %data_dir.display(), "mail guard ready");
        Ok(Self { store })
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Import an envelope from a byte stream: parse, verify, persist.
    ///
    /// A parse failure aborts the pipeline with no record. A persistence
    /// failure does not: the verdict is returned alongside the store error.
    pub async fn import_email<R: Read>(&self, reader: R) -> Result<ImportOutcome, GuardError> {
        let email = parse_email(reader, Utc::now())?;
        Ok(self.verify_and_persist(email).await)
    }

    /// Import an envelope file from disk.
    pub async fn import_email_file(&self, path: &Path) -> Result<ImportOutcome, GuardError> {
        let file = File::open(path)?;
        self.import_email(BufReader::new(file)).await
    }

    async fn verify_and_persist(&self, mut email: Email) -> ImportOutcome {
        let verification = verify_email(&email);
        email.verification_status = verification.overall_status();

        let persist_error = match self.store.save_email(&email).await {
            Ok(id) => {
                email.id = id;
                None
            }
            Err(err) => {
                // Saving is not critical for reporting the verdict.
                tracing::warn!(error = %err, "verified email could not be persisted");
                Some(err)
            }
        };

        tracing::info!(
            id = email.id,
            status = email.verification_status.as_str(),
            "email imported"
        );

        ImportOutcome {
            email,
            verification,
            persist_error,
        }
    }

    /// Re-select a stored email. Content is re-verified on every open; the
    /// stored status is only rewritten when the record was still pending.
    pub async fn open_email(&self, id: i64) -> Result<OpenedEmail, GuardError> {
        let mut email = self.store.email_by_id(id).await?;
        let verification = verify_email(&email);

        if email.verification_status == VerificationStatus::Pending {
            let status = verification.overall_status();
            if let Err(err) = self.store.update_status(id, status).await {
                tracing::warn!(id, error = %err, "status transition not persisted");
            }
            email.verification_status = status;
        }

        Ok(OpenedEmail {
            email,
            verification,
        })
    }

    /// Saved emails, newest import first.
    pub async fn history(&self) -> Result<Vec<Email>, GuardError> {
        Ok(self.store.list_emails().await?)
    }

    pub async fn delete_email(&self, id: i64) -> Result<(), GuardError> {
        self.store.delete_email(id).await?;
        Ok(())
    }

    pub async fn clear_history(&self) -> Result<(), GuardError> {
        self.store.clear_emails().await?;
        Ok(())
    }
}
