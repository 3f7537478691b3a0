//! Caller-facing note types.

use chrono::{DateTime, Utc};
use pn_store::NoteRecord;
use serde::Serialize;
use std::fmt;

/// An envelope blob as stored.  Only the cipher can turn it back into text.
#[derive(Clone, PartialEq, Eq)]
pub struct Sealed(String);

impl Sealed {
    pub fn new(blob: String) -> Self {
        Self(blob)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Sealed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sealed({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Plain { title: String, content: String },
    Encrypted { title: Sealed, content: Sealed },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub body: NoteBody,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn is_encrypted(&self) -> bool {
        matches!(self.body, NoteBody::Encrypted { .. })
    }

    /// Plain title, or `None` for a sealed note.
    pub fn plain_title(&self) -> Option<&str> {
        match &self.body {
            NoteBody::Plain { title, .. } => Some(title),
            NoteBody::Encrypted { .. } => None,
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(row: NoteRecord) -> Self {
        let body = if row.encrypted {
            NoteBody::Encrypted {
                title: Sealed(row.title),
                content: Sealed(row.content),
            }
        } else {
            NoteBody::Plain {
                title: row.title,
                content: row.content,
            }
        };
        Self {
            id: row.id,
            body,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        let (title, content, encrypted) = match note.body {
            NoteBody::Plain { title, content } => (title, content, false),
            NoteBody::Encrypted { title, content } => (title.0, content.0, true),
        };
        Self {
            id: note.id,
            title,
            content,
            encrypted,
            tags: note.tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Plaintext view of a note, produced on demand for display.
///
/// `was_encrypted` records how the note is stored.  There is deliberately no
/// conversion back to [`NoteRecord`]: decrypted text is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub was_encrypted: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
