//! pn_store — durable note storage for pnotes
//!
//! # Storage strategy
//! One SQLite file, one `notes` table, one connection.  Encrypted notes are
//! stored exactly like plain ones: the `encrypted` column is the only
//! difference, and the store never looks inside an encrypted title or body.
//!
//! - Tags are written as a JSON array per row.
//! - Timestamps are RFC 3339 UTC text with second precision, so text order
//!   is time order.
//! - WAL journal + `synchronous=NORMAL`: committed writes survive a crash.
//!
//! # Migration
//! The first `Store::open` against an empty database imports the old
//! `notes.json` dump (see [`legacy`]) and renames it to `notes.json.backup`.

pub mod db;
pub mod error;
pub mod legacy;
pub mod models;
pub mod paths;

pub use db::{Scan, SkippedRow, Store, StoreOptions};
pub use error::{Result, StoreError};
pub use legacy::ImportOutcome;
pub use models::NoteRecord;
