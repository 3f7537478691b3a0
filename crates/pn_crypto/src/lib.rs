//! pn_crypto — password-based envelope encryption for note fields
//!
//! # Design principles
//! - NO custom crypto; PBKDF2, HMAC-SHA256 and AES-GCM come from the RustCrypto crates.
//! - Zeroize derived key material on drop.
//! - No key is ever persisted or cached: every call re-derives from the password.
//!
//! # Module layout
//! - `kdf`       — PBKDF2-HMAC-SHA256 key derivation + salt generation
//! - `aead`      — AES-256-GCM seal/open helpers
//! - `envelope`  — `salt || nonce || ciphertext` packing, base64 text form
//! - `error`     — unified error type

pub mod aead;
pub mod envelope;
pub mod error;
pub mod kdf;

pub use envelope::{decrypt, encrypt, EnvelopeCipher, PasswordEnvelope};
pub use error::CryptoError;
