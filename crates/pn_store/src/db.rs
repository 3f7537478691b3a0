//! SQLite note store.
//!
//! A single connection behind a single lock.  Every operation holds the lock
//! for its whole duration, so a write never overlaps another read or write,
//! and there is no second connection to fight over SQLite's file locks.
//!
//! The lock is an exclusive mutex rather than a reader/writer lock: a
//! rusqlite `Connection` is `!Sync`, so even reads cannot share it.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::legacy;
use crate::models::{decode_tags, decode_time, encode_tags, encode_time, NoteRecord};
use crate::paths;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

const SELECT_COLUMNS: &str =
    "SELECT id, title, content, encrypted, tags, created_at, updated_at FROM notes";

/// Where the store lives on disk.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub db_path: PathBuf,
    /// Old flat-file dump to import on open; `None` skips the import.
    pub legacy_path: Option<PathBuf>,
}

impl StoreOptions {
    /// `~/.pnotes/notes.db`, importing `~/.pnotes/notes.json`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::in_dir(&paths::data_dir()?))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            db_path: paths::db_path(dir),
            legacy_path: Some(paths::legacy_path(dir)),
        }
    }
}

/// A row that could not be turned into a note during a full scan.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    /// Zero-based position in `updated_at DESC` order.
    pub position: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Result of a full-table scan: the notes that decoded, newest first, and
/// the rows that did not.  Can be iterated as many times as needed.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    notes: Vec<NoteRecord>,
    skipped: Vec<SkippedRow>,
}

impl Scan {
    pub fn notes(&self) -> &[NoteRecord] {
        &self.notes
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteRecord> {
        self.notes.iter()
    }

    pub fn into_notes(self) -> Vec<NoteRecord> {
        self.notes
    }
}

impl IntoIterator for Scan {
    type Item = NoteRecord;
    type IntoIter = std::vec::IntoIter<NoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Scan {
    type Item = &'a NoteRecord;
    type IntoIter = std::slice::Iter<'a, NoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// Note store handle.  Share it with `Arc`; dropping the last handle closes
/// the connection.
pub struct Store {
    conn: Mutex<Option<Connection>>,
}

impl Store {
    /// Open or create the database, bootstrap the schema, then run the
    /// one-time legacy import if `options.legacy_path` is set.
    pub fn open(options: &StoreOptions) -> Result<Self> {
        if let Some(parent) = options.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&options.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = 10000;
             PRAGMA foreign_keys = ON;",
        )?;

        let store = Self::from_connection(conn)?;
        debug!(path = %options.db_path.display(), "note store opened");

        if let Some(legacy_path) = &options.legacy_path {
            let outcome = legacy::import_legacy(&store, legacy_path);
            debug!(?outcome, "legacy import check finished");
        }

        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        f(conn)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Every row, newest `updated_at` first.  Rows that fail to decode are
    /// reported in [`Scan::skipped`] instead of failing the scan.
    pub fn scan(&self) -> Result<Scan> {
        self.scan_matching(None)
    }

    /// Like [`scan`](Self::scan), limited to rows whose `encrypted` flag
    /// equals `encrypted`.
    pub fn scan_by_encrypted(&self, encrypted: bool) -> Result<Scan> {
        self.scan_matching(Some(encrypted))
    }

    fn scan_matching(&self, encrypted: Option<bool>) -> Result<Scan> {
        self.with_conn(|conn| {
            let filter = if encrypted.is_some() { "WHERE encrypted = ?1 " } else { "" };
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} {filter}ORDER BY updated_at DESC, rowid DESC"
            ))?;
            let mut rows = match encrypted {
                Some(flag) => stmt.query(params![flag])?,
                None => stmt.query([])?,
            };
            let mut scan = Scan::default();
            let mut position = 0;
            while let Some(row) = rows.next()? {
                match row_to_note(row) {
                    Ok(note) => scan.notes.push(note),
                    Err(e) => scan.skipped.push(SkippedRow {
                        position,
                        id: row.get::<_, Option<String>>(0).ok().flatten(),
                        reason: e.to_string(),
                    }),
                }
                position += 1;
            }
            Ok(scan)
        })
    }

    /// All readable notes, newest first.  Skipped rows are logged.
    pub fn get_all(&self) -> Result<Vec<NoteRecord>> {
        Ok(log_skipped(self.scan()?))
    }

    /// All readable notes with the given `encrypted` flag, newest first.
    pub fn get_by_encrypted(&self, encrypted: bool) -> Result<Vec<NoteRecord>> {
        Ok(log_skipped(self.scan_by_encrypted(encrypted)?))
    }

    /// Look up one note.  An empty id is simply not found.
    pub fn get_by_id(&self, id: &str) -> Result<Option<NoteRecord>> {
        if id.is_empty() {
            return Ok(None);
        }
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_note,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert a new note.  Fails on a duplicate id.
    pub fn create(&self, note: &NoteRecord) -> Result<()> {
        let tags = encode_tags(&note.tags)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, title, content, encrypted, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    note.id,
                    note.title,
                    note.content,
                    note.encrypted,
                    tags,
                    encode_time(&note.created_at),
                    encode_time(&note.updated_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Overwrite title, content, encrypted flag, tags and `updated_at`.
    /// `id` and `created_at` never change.
    pub fn update(&self, note: &NoteRecord) -> Result<()> {
        let tags = encode_tags(&note.tags)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE notes
                 SET title = ?1, content = ?2, encrypted = ?3, tags = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    note.title,
                    note.content,
                    note.encrypted,
                    tags,
                    encode_time(&note.updated_at),
                    note.id,
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(note.id.clone()));
            }
            Ok(())
        })
    }

    /// Delete a note.  Deleting an id that does not exist is not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Ok(());
        }
        self.with_conn(|conn| {
            conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    /// Release the connection.  Every later call returns [`StoreError::Closed`];
    /// closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.lock().take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        debug!("note store closed");
        Ok(())
    }
}

fn log_skipped(scan: Scan) -> Vec<NoteRecord> {
    for row in scan.skipped() {
        warn!(
            position = row.position,
            note_id = row.id.as_deref().unwrap_or("?"),
            reason = %row.reason,
            "skipping unreadable note row"
        );
    }
    scan.into_notes()
}

/// Run schema migrations.  Safe on every startup.
fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    if current_version < 1 {
        migrate_v1(conn)?;
        debug!(version = SCHEMA_VERSION, "note schema created");
    }

    Ok(())
}

/// Schema version 1 - notes table plus listing and filter indexes
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            encrypted INTEGER NOT NULL DEFAULT 0,
            tags TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes(updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_notes_encrypted ON notes(encrypted);

        INSERT OR REPLACE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}

fn row_to_note(row: &Row) -> rusqlite::Result<NoteRecord> {
    let id: String = row.get(0)?;
    let tags: Option<String> = row.get(4)?;
    let created_at: Option<String> = row.get(5).ok().flatten();
    let updated_at: Option<String> = row.get(6).ok().flatten();

    Ok(NoteRecord {
        tags: decode_tags(&id, tags.as_deref()),
        title: row.get(1)?,
        content: row.get(2)?,
        encrypted: row.get(3)?,
        created_at: decode_time(created_at.as_deref()),
        updated_at: decode_time(updated_at.as_deref()),
        id,
    })
}
