//! Authenticated encryption
//!
//! AES-256-GCM, 96-bit random nonce, 128-bit tag, no associated data.
//! The nonce is returned separately; `envelope` decides where it lives.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::error::CryptoError;
use crate::kdf::KEY_LEN;

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext`; output is ciphertext with the tag appended.
pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encrypt)
}

/// Decrypt and verify `ciphertext` (tag included).
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::Decrypt);
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Decrypt)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = [3u8; KEY_LEN];
        let nonce = generate_nonce();
        let ct = seal(&key, &nonce, b"meeting at noon").unwrap();
        assert_eq!(ct.len(), b"meeting at noon".len() + TAG_LEN);
        assert_eq!(open(&key, &nonce, &ct).unwrap(), b"meeting at noon");
    }

    #[test]
    fn wrong_nonce_is_rejected() {
        let key = [3u8; KEY_LEN];
        let ct = seal(&key, &[0u8; NONCE_LEN], b"data").unwrap();
        assert!(matches!(open(&key, &[1u8; NONCE_LEN], &ct), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn flipped_tag_bit_is_rejected() {
        let key = [9u8; KEY_LEN];
        let nonce = generate_nonce();
        let mut ct = seal(&key, &nonce, b"data").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert!(matches!(open(&key, &nonce, &ct), Err(CryptoError::Decrypt)));
    }
}
