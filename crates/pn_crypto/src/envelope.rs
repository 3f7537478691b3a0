//! Password envelope
//!
//! Wire format (before base64, standard alphabet with padding):
//!   [ salt (16 bytes) | nonce (12 bytes) | ciphertext + tag ]
//!
//! Every call draws a fresh salt and nonce, so sealing the same text twice
//! with the same password never yields the same blob.  The envelope carries
//! everything except the password.

use base64::{engine::general_purpose, Engine as _};

use crate::aead::{self, NONCE_LEN};
use crate::error::CryptoError;
use crate::kdf::{self, SALT_LEN};

const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Encrypt `plaintext` under `password` into a self-contained base64 blob.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let salt = kdf::generate_salt();
    let key = kdf::derive_key(password.as_bytes(), &salt)?;
    let nonce = aead::generate_nonce();
    let ciphertext = aead::seal(&key, &nonce, plaintext.as_bytes())?;

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(general_purpose::STANDARD.encode(out))
}

/// Decrypt a blob produced by [`encrypt`].
pub fn decrypt(blob: &str, password: &str) -> Result<String, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let data = general_purpose::STANDARD.decode(blob)?;
    if data.len() < HEADER_LEN {
        return Err(CryptoError::Malformed(data.len()));
    }
    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let key = kdf::derive_key(password.as_bytes(), salt)?;
    let plaintext = aead::open(&key, nonce, ciphertext)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
}

/// Seam between note operations and the cipher.
pub trait EnvelopeCipher: Send + Sync {
    fn seal(&self, plaintext: &str, password: &str) -> Result<String, CryptoError>;
    fn open(&self, blob: &str, password: &str) -> Result<String, CryptoError>;
}

/// PBKDF2 + AES-256-GCM envelope, the only format pnotes writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordEnvelope;

impl EnvelopeCipher for PasswordEnvelope {
    fn seal(&self, plaintext: &str, password: &str) -> Result<String, CryptoError> {
        encrypt(plaintext, password)
    }

    fn open(&self, blob: &str, password: &str) -> Result<String, CryptoError> {
        decrypt(blob, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aead::TAG_LEN;

    #[test]
    fn roundtrip() {
        for text in ["", "T", "groceries: eggs, milk", "ünïcødé ✓ 日本語"] {
            let blob = encrypt(text, "pw").unwrap();
            assert_eq!(decrypt(&blob, "pw").unwrap(), text);
        }
    }

    #[test]
    fn wrong_password_fails() {
        let blob = encrypt("secret plans", "pw1").unwrap();
        assert!(matches!(decrypt(&blob, "pw2"), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn same_input_gives_different_blobs() {
        let a = encrypt("same", "pw").unwrap();
        let b = encrypt("same", "pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn blob_layout() {
        let blob = encrypt("hello", "pw").unwrap();
        let raw = general_purpose::STANDARD.decode(&blob).unwrap();
        assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + "hello".len() + TAG_LEN);
    }

    #[test]
    fn empty_password_rejected() {
        assert!(matches!(encrypt("x", ""), Err(CryptoError::EmptyPassword)));
        let blob = encrypt("x", "pw").unwrap();
        assert!(matches!(decrypt(&blob, ""), Err(CryptoError::EmptyPassword)));
    }

    #[test]
    fn short_blob_is_malformed() {
        let short = general_purpose::STANDARD.encode([0u8; HEADER_LEN - 1]);
        assert!(matches!(decrypt(&short, "pw"), Err(CryptoError::Malformed(27))));
    }

    #[test]
    fn non_base64_rejected() {
        assert!(matches!(
            decrypt("not base64!!", "pw"),
            Err(CryptoError::Base64Decode(_))
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_like_wrong_password() {
        let blob = encrypt("ledger", "pw").unwrap();
        let mut raw = general_purpose::STANDARD.decode(&blob).unwrap();
        raw[HEADER_LEN] ^= 0x80;
        let tampered = general_purpose::STANDARD.encode(raw);
        assert!(matches!(decrypt(&tampered, "pw"), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn non_utf8_plaintext_is_a_decrypt_error() {
        let salt = kdf::generate_salt();
        let key = kdf::derive_key(b"pw", &salt).unwrap();
        let nonce = aead::generate_nonce();
        let ciphertext = aead::seal(&key, &nonce, &[0xff, 0xfe, 0x80]).unwrap();

        let mut raw = Vec::new();
        raw.extend_from_slice(&salt);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        let blob = general_purpose::STANDARD.encode(raw);

        assert!(matches!(decrypt(&blob, "pw"), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn trait_object_seals_and_opens() {
        let cipher: Box<dyn EnvelopeCipher> = Box::new(PasswordEnvelope);
        let blob = cipher.seal("via trait", "pw").unwrap();
        assert_eq!(cipher.open(&blob, "pw").unwrap(), "via trait");
    }
}
