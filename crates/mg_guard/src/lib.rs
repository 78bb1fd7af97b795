//! mg_guard - Mail Guard service layer.
//!
//! Wires the lower crates together: preference file, key manager, encrypted
//! store. Exposes the per-record pipeline (parse, verify, persist), the
//! saved-email history, and a sample envelope generator.

pub mod error;
pub mod paths;
pub mod prefs;
pub mod sample;
pub mod service;

pub use error::GuardError;
pub use service::{ImportOutcome, MailGuard, OpenedEmail};

/// Install the process-wide tracing subscriber. Call once at startup.
/// Respects `RUST_LOG`, defaulting to info-level output for the mail guard
/// crates.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mg_guard=info,mg_store=info".into()),
        )
        .init();
}
