//! Note operations over a shared [`Store`].

use chrono::{DateTime, SubsecRound, Utc};
use pn_crypto::{EnvelopeCipher, PasswordEnvelope};
use pn_store::{NoteRecord, Store, StoreError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{NoteError, Result};
use crate::filter::ListFilter;
use crate::note::{DecryptedNote, Note, NoteBody, Sealed};
use crate::tags::normalize_tags;

pub struct NoteService<C = PasswordEnvelope> {
    store: Arc<Store>,
    cipher: C,
}

impl NoteService<PasswordEnvelope> {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_cipher(store, PasswordEnvelope)
    }
}

impl<C: EnvelopeCipher> NoteService<C> {
    pub fn with_cipher(store: Arc<Store>, cipher: C) -> Self {
        Self { store, cipher }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// All notes, most recently updated first.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.store.get_all()?.into_iter().map(Note::from).collect())
    }

    /// Notes matching `filter`, most recently updated first.  The
    /// encrypted-state filter runs in the store; tags are matched after.
    pub fn list_filtered(&self, filter: &ListFilter) -> Result<Vec<Note>> {
        let records = match filter.encrypted {
            Some(flag) => self.store.get_by_encrypted(flag)?,
            None => self.store.get_all()?,
        };
        let wanted = normalize_tags(&filter.tags);
        Ok(records
            .into_iter()
            .map(Note::from)
            .filter(|note| filter.keeps_tags(&wanted, &note.tags))
            .collect())
    }

    /// Every tag in use across all notes, sorted, each once.
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let tags: BTreeSet<String> = self
            .store
            .get_all()?
            .into_iter()
            .flat_map(|note| note.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        Ok(self.store.get_by_id(id)?.map(Note::from))
    }

    pub fn create_note<S: AsRef<str>>(
        &self,
        title: &str,
        content: &str,
        tags: &[S],
    ) -> Result<Note> {
        let (title, content) = validate_text(title, content)?;
        self.insert(NoteBody::Plain { title, content }, tags)
    }

    pub fn create_encrypted_note<S: AsRef<str>>(
        &self,
        title: &str,
        content: &str,
        password: &str,
        tags: &[S],
    ) -> Result<Note> {
        require_password(password)?;
        let (title, content) = validate_text(title, content)?;
        let body = self.seal(&title, &content, password)?;
        self.insert(body, tags)
    }

    /// Replace a note's text and tags with plain values.  An encrypted note
    /// updated this way is stored in the clear from then on.
    pub fn update_note<S: AsRef<str>>(
        &self,
        id: &str,
        title: &str,
        content: &str,
        tags: &[S],
    ) -> Result<Note> {
        let existing = self.load(id)?;
        let (title, content) = validate_text(title, content)?;
        self.replace(existing, NoteBody::Plain { title, content }, tags)
    }

    /// Replace a note's text and tags, sealing the text under `password`
    /// with a fresh salt and nonce.
    pub fn update_encrypted_note<S: AsRef<str>>(
        &self,
        id: &str,
        title: &str,
        content: &str,
        password: &str,
        tags: &[S],
    ) -> Result<Note> {
        require_id(id)?;
        require_password(password)?;
        let existing = self.load(id)?;
        let (title, content) = validate_text(title, content)?;
        let body = self.seal(&title, &content, password)?;
        self.replace(existing, body, tags)
    }

    /// Plaintext of a note.  Plain notes are returned as they are.
    pub fn decrypt_note(&self, id: &str, password: &str) -> Result<DecryptedNote> {
        require_id(id)?;
        require_password(password)?;
        let note = Note::from(self.load(id)?);

        let (title, content, was_encrypted) = match note.body {
            NoteBody::Plain { title, content } => (title, content, false),
            NoteBody::Encrypted { title, content } => {
                let title = self.open(&title, password)?;
                let content = self.open(&content, password)?;
                (title, content, true)
            }
        };

        Ok(DecryptedNote {
            id: note.id,
            title,
            content,
            was_encrypted,
            tags: note.tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        })
    }

    /// Delete a note.  Deleting a note that is already gone succeeds.
    pub fn delete_note(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.store.delete(id)?;
        debug!(note_id = %id, "note deleted");
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn load(&self, id: &str) -> Result<NoteRecord> {
        require_id(id)?;
        self.store
            .get_by_id(id)?
            .ok_or_else(|| NoteError::NotFound(id.to_string()))
    }

    fn insert<S: AsRef<str>>(&self, body: NoteBody, tags: &[S]) -> Result<Note> {
        let now = now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            body,
            tags: normalize_tags(tags),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&NoteRecord::from(note.clone()))?;
        debug!(note_id = %note.id, encrypted = note.is_encrypted(), "note created");
        Ok(note)
    }

    fn replace<S: AsRef<str>>(
        &self,
        existing: NoteRecord,
        body: NoteBody,
        tags: &[S],
    ) -> Result<Note> {
        let note = Note {
            id: existing.id,
            body,
            tags: normalize_tags(tags),
            created_at: existing.created_at,
            updated_at: now().max(existing.created_at),
        };
        // the note can vanish between `load` and here
        self.store
            .update(&NoteRecord::from(note.clone()))
            .map_err(|e| match e {
                StoreError::NotFound(id) => NoteError::NotFound(id),
                other => NoteError::Repository(other),
            })?;
        debug!(note_id = %note.id, encrypted = note.is_encrypted(), "note updated");
        Ok(note)
    }

    fn seal(&self, title: &str, content: &str, password: &str) -> Result<NoteBody> {
        let seal = |text: &str| {
            self.cipher
                .seal(text, password)
                .map(Sealed::new)
                .map_err(|_| NoteError::EncryptionFailed)
        };
        Ok(NoteBody::Encrypted {
            title: seal(title)?,
            content: seal(content)?,
        })
    }

    fn open(&self, sealed: &Sealed, password: &str) -> Result<String> {
        self.cipher
            .open(sealed.as_str(), password)
            .map_err(|_| NoteError::DecryptionFailed)
    }
}

/// Stored timestamps keep whole seconds; match that up front so the note
/// handed back equals the one read later.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(NoteError::InvalidInput("note id cannot be empty"));
    }
    Ok(())
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(NoteError::InvalidInput("password cannot be empty"));
    }
    Ok(())
}

fn validate_text(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() && content.is_empty() {
        return Err(NoteError::InvalidInput("title and content cannot both be empty"));
    }
    Ok((title.to_string(), content.to_string()))
}
