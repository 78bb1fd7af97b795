use directories::ProjectDirs;
use std::path::PathBuf;

use crate::error::GuardError;

pub const APP_QUALIFIER: &str = "rw";
pub const APP_ORG: &str = "delasoft";
pub const APP_NAME: &str = "mailguard";

/// Database file inside the data directory.
pub const DB_FILE: &str = "mailguard.db";
/// Preference file holding the wrapped store key material.
pub const PREFS_FILE: &str = "prefs.json";
/// File name used by the sample envelope generator.
pub const SAMPLE_FILE: &str = "sample_email.pb";

pub fn data_dir() -> Result<PathBuf, GuardError> {
    let dirs =
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).ok_or(GuardError::NoDataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn db_path() -> Result<PathBuf, GuardError> {
    Ok(data_dir()?.join(DB_FILE))
}

pub fn prefs_path() -> Result<PathBuf, GuardError> {
    Ok(data_dir()?.join(PREFS_FILE))
}
