use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Store is closed")]
    Closed,

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, StoreError>;
