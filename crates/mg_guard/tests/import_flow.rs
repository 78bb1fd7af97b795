//! End-to-end tests over the import pipeline, against a scratch data
//! directory and an in-memory keystore.
//!
//! Tests cover:
//!  1. Well-formed envelope imports as VERIFIED and lands in history
//!  2. Tampered body fails verification but is still persisted
//!  3. Attachment integrity rules (missing hash, wrong hash)
//!  4. Malformed input is a parse error with no partial record
//!  5. Reopen with the same keystore reads history back
//!  6. Pending records re-verify and persist the transition on open
//!  7. Non-pending records keep their stored status on open
//!  8. Key material corruption refuses to initialize
//!  9. Sample envelope file round-trips through the full pipeline

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use prost::Message;

use mg_crypto::keystore::MemoryKeystore;
use mg_crypto::keywrap::PREF_KEY_IV;
use mg_crypto::CryptoError;
use mg_guard::{sample, GuardError, MailGuard};
use mg_proto::{Email, SecureEmail, VerificationStatus};

fn envelope(body: &str, image: Option<&[u8]>) -> SecureEmail {
    let (attached_image, image_hash) = match image {
        Some(bytes) => (bytes.to_vec(), mg_crypto::hash::sha256_hex(bytes)),
        None => (Vec::new(), String::new()),
    };
    SecureEmail {
        sender_name: "Mugisha Jean Claude".to_string(),
        sender_email_address: "mugisha.jc@qtglobal.rw".to_string(),
        subject: "Integrity check".to_string(),
        body: body.to_string(),
        attached_image,
        body_hash: mg_crypto::hash::sha256_hex_text(body),
        image_hash,
    }
}

async fn open_guard(dir: &Path, keystore: &Arc<MemoryKeystore>) -> MailGuard {
    MailGuard::open_with_keystore(dir, keystore.clone())
        .await
        .expect("open mail guard")
}

#[tokio::test]
async fn well_formed_envelope_imports_as_verified() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let bytes = envelope("Muraho from Kigali", Some(sample::SAMPLE_PNG)).encode_to_vec();
    let outcome = guard.import_email(Cursor::new(bytes)).await.unwrap();

    assert_eq!(
        outcome.email.verification_status,
        VerificationStatus::Verified
    );
    assert!(outcome.verification.is_fully_verified());
    assert!(outcome.is_persisted());

    let history = guard.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, outcome.email.id);
    assert_eq!(history[0].body, "Muraho from Kigali");
    assert_eq!(history[0].verification_status, VerificationStatus::Verified);
}

#[tokio::test]
async fn tampered_body_fails_but_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let mut env = envelope("original body", None);
    env.body = "tampered body".to_string();

    let outcome = guard
        .import_email(Cursor::new(env.encode_to_vec()))
        .await
        .unwrap();

    assert_eq!(
        outcome.email.verification_status,
        VerificationStatus::VerificationFailed
    );
    assert!(!outcome.verification.is_body_verified);
    assert!(outcome.verification.is_image_verified);
    assert!(outcome.is_persisted());

    // Failed verdicts are history too.
    let opened = guard.open_email(outcome.email.id).await.unwrap();
    assert_eq!(
        opened.email.verification_status,
        VerificationStatus::VerificationFailed
    );
}

#[tokio::test]
async fn attachment_without_expected_hash_fails() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let mut env = envelope("body", Some(&[1, 2, 3]));
    env.image_hash = String::new();

    let outcome = guard
        .import_email(Cursor::new(env.encode_to_vec()))
        .await
        .unwrap();

    assert!(outcome.verification.is_body_verified);
    assert!(!outcome.verification.is_image_verified);
    assert_eq!(
        outcome.email.verification_status,
        VerificationStatus::VerificationFailed
    );
}

#[tokio::test]
async fn attachment_with_wrong_expected_hash_fails() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let mut env = envelope("Hello", Some(&[1, 2, 3]));
    env.image_hash = "deadbeef".to_string();

    let outcome = guard
        .import_email(Cursor::new(env.encode_to_vec()))
        .await
        .unwrap();

    assert!(outcome.verification.is_body_verified);
    assert!(!outcome.verification.is_image_verified);
    assert_eq!(
        outcome.email.verification_status,
        VerificationStatus::VerificationFailed
    );
}

#[tokio::test]
async fn malformed_input_is_a_parse_error_with_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let err = guard
        .import_email(Cursor::new(vec![0xFF; 16]))
        .await
        .unwrap_err();

    assert!(matches!(err, GuardError::Parse(_)));
    assert!(guard.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());

    let id = {
        let guard = open_guard(dir.path(), &keystore).await;
        let bytes = envelope("persisted across restarts", None).encode_to_vec();
        guard
            .import_email(Cursor::new(bytes))
            .await
            .unwrap()
            .email
            .id
    };

    let guard = open_guard(dir.path(), &keystore).await;
    let opened = guard.open_email(id).await.unwrap();
    assert_eq!(opened.email.body, "persisted across restarts");
    assert_eq!(
        opened.email.verification_status,
        VerificationStatus::Verified
    );
}

#[tokio::test]
async fn pending_record_persists_transition_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    // A record saved before any verification ran.
    let bytes = envelope("not yet verified", None).encode_to_vec();
    let email = mg_proto::parse_email(Cursor::new(bytes), Utc::now()).unwrap();
    assert_eq!(email.verification_status, VerificationStatus::Pending);
    let id = guard.store().save_email(&email).await.unwrap();

    let opened = guard.open_email(id).await.unwrap();
    assert_eq!(
        opened.email.verification_status,
        VerificationStatus::Verified
    );

    // The transition is durable.
    let stored = guard.store().email_by_id(id).await.unwrap();
    assert_eq!(stored.verification_status, VerificationStatus::Verified);
}

#[tokio::test]
async fn non_pending_record_keeps_stored_status_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    // A record whose stored verdict no longer matches its content.
    let email = Email {
        id: 0,
        sender_name: "Mugisha Jean Claude".to_string(),
        sender_email: "mugisha.jc@qtglobal.rw".to_string(),
        subject: "Stale verdict".to_string(),
        body: "content".to_string(),
        attached_image: None,
        body_hash: mg_crypto::hash::sha256_hex_text("different content"),
        image_hash: String::new(),
        verification_status: VerificationStatus::Verified,
        imported_at: Utc::now(),
    };
    let id = guard.store().save_email(&email).await.unwrap();

    let opened = guard.open_email(id).await.unwrap();
    // Fresh verdict for display says failed, but the stored status stands.
    assert!(!opened.verification.is_body_verified);
    assert_eq!(
        opened.email.verification_status,
        VerificationStatus::Verified
    );
    let stored = guard.store().email_by_id(id).await.unwrap();
    assert_eq!(stored.verification_status, VerificationStatus::Verified);
}

#[tokio::test]
async fn partial_wrapped_key_state_refuses_to_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    {
        let _guard = open_guard(dir.path(), &keystore).await;
    }

    // Drop one of the two wrapped-key entries from the preference file.
    let prefs_path = dir.path().join("prefs.json");
    let mut payload: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&prefs_path).unwrap()).unwrap();
    payload["entries"]
        .as_object_mut()
        .unwrap()
        .remove(PREF_KEY_IV);
    std::fs::write(&prefs_path, serde_json::to_vec(&payload).unwrap()).unwrap();

    let err = MailGuard::open_with_keystore(dir.path(), keystore.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GuardError::Key(CryptoError::WrappedKeyCorrupted(_))
    ));
}

#[tokio::test]
async fn missing_master_key_is_fatal_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    {
        let _guard = open_guard(dir.path(), &keystore).await;
    }

    // Same wrapped key on disk, but the master key is gone. The store key
    // must not be silently regenerated while encrypted data remains.
    let other_keystore = Arc::new(MemoryKeystore::new());
    let err = MailGuard::open_with_keystore(dir.path(), other_keystore)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GuardError::Key(CryptoError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn sample_file_imports_fully_verified() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let path = sample::write_sample_file(dir.path()).unwrap();
    let outcome = guard.import_email_file(&path).await.unwrap();

    assert_eq!(
        outcome.email.verification_status,
        VerificationStatus::Verified
    );
    assert_eq!(outcome.email.sender_email, "mugisha.jc@qtglobal.rw");
    assert!(outcome.email.has_attachment());
    assert!(outcome.is_persisted());
}

#[tokio::test]
async fn delete_and_clear_history() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = Arc::new(MemoryKeystore::new());
    let guard = open_guard(dir.path(), &keystore).await;

    let mut ids = Vec::new();
    for body in ["first", "second", "third"] {
        let bytes = envelope(body, None).encode_to_vec();
        ids.push(guard.import_email(Cursor::new(bytes)).await.unwrap().email.id);
    }

    guard.delete_email(ids[0]).await.unwrap();
    assert_eq!(guard.history().await.unwrap().len(), 2);

    guard.clear_history().await.unwrap();
    assert!(guard.history().await.unwrap().is_empty());
}
