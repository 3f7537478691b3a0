//! One-time import of the old `notes.json` dump.
//!
//! Best effort from start to finish: nothing here may stop the store from
//! opening.  Every outcome, including failures, comes back as an
//! [`ImportOutcome`] and is logged.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::db::Store;
use crate::models::NoteRecord;
use crate::paths::backup_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No dump at the expected location.
    NoLegacyFile,
    /// The store already holds notes; the dump is left untouched.
    StoreNotEmpty,
    /// The dump exists but holds no notes.
    Empty,
    /// The dump could not be read or parsed; it is left in place.
    Failed(String),
    Imported {
        imported: usize,
        failed: usize,
        /// Where the dump was moved, or `None` if the rename failed.
        backup: Option<PathBuf>,
    },
}

/// Import `legacy_path` into `store` if the store is empty, then rename the
/// dump to `<legacy_path>.backup` so it is never imported twice.
pub fn import_legacy(store: &Store, legacy_path: &Path) -> ImportOutcome {
    if !legacy_path.exists() {
        return ImportOutcome::NoLegacyFile;
    }

    match store.count() {
        Ok(0) => {}
        Ok(_) => return ImportOutcome::StoreNotEmpty,
        Err(e) => {
            warn!(error = %e, "legacy import skipped: cannot count notes");
            return ImportOutcome::Failed(e.to_string());
        }
    }

    let notes = match read_dump(legacy_path) {
        Ok(notes) if notes.is_empty() => return ImportOutcome::Empty,
        Ok(notes) => notes,
        Err(reason) => {
            warn!(path = %legacy_path.display(), %reason, "legacy import skipped");
            return ImportOutcome::Failed(reason);
        }
    };

    let mut imported = 0;
    let mut failed = 0;
    for note in &notes {
        match store.create(note) {
            Ok(()) => imported += 1,
            Err(e) => {
                failed += 1;
                warn!(note_id = %note.id, error = %e, "legacy note not imported");
            }
        }
    }

    let target = backup_path(legacy_path);
    let backup = match fs::rename(legacy_path, &target) {
        Ok(()) => Some(target),
        Err(e) => {
            warn!(path = %legacy_path.display(), error = %e, "could not rename legacy dump");
            None
        }
    };

    info!(imported, failed, "imported notes from legacy dump");
    ImportOutcome::Imported {
        imported,
        failed,
        backup,
    }
}

fn read_dump(path: &Path) -> Result<Vec<NoteRecord>, String> {
    let data = fs::read(path).map_err(|e| format!("read: {e}"))?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice::<Option<Vec<NoteRecord>>>(&data)
        .map(Option::unwrap_or_default)
        .map_err(|e| format!("parse: {e}"))
}
