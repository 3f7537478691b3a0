use pn_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Encryption failed")]
    EncryptionFailed,

    /// Wrong password and corrupted data are reported identically.
    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Repository error: {0}")]
    Repository(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, NoteError>;
