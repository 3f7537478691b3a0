use directories::BaseDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

pub const APP_DIR: &str = ".pnotes";
pub const DB_FILE: &str = "notes.db";
pub const LEGACY_FILE: &str = "notes.json";
pub const BACKUP_SUFFIX: &str = ".backup";

/// `<home>/.pnotes`
pub fn data_dir() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or(StoreError::NoHomeDir)?;
    Ok(dirs.home_dir().join(APP_DIR))
}

pub fn db_path(dir: &Path) -> PathBuf {
    dir.join(DB_FILE)
}

pub fn legacy_path(dir: &Path) -> PathBuf {
    dir.join(LEGACY_FILE)
}

/// `notes.json` → `notes.json.backup`
pub fn backup_path(legacy: &Path) -> PathBuf {
    let mut name: OsString = legacy.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
