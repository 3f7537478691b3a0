//! pn_notes — note operations for pnotes
//!
//! Sits between a caller (the CLI, or any other shell) and the store:
//! trims and validates input, normalizes tags, seals encrypted notes with
//! the envelope cipher, and translates every failure into [`NoteError`].
//!
//! Callers see [`Note`], whose body is either plain text or sealed blobs;
//! the store keeps a flat row with an `encrypted` flag.

pub mod error;
pub mod filter;
pub mod note;
pub mod service;
pub mod tags;

pub use error::NoteError;
pub use filter::ListFilter;
pub use note::{DecryptedNote, Note, NoteBody, Sealed};
pub use service::NoteService;
pub use tags::normalize_tags;
