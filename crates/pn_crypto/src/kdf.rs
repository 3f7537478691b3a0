//! Key derivation
//!
//! `derive_key` — PBKDF2-HMAC-SHA256, stretches a note password and a random
//!   salt into the 32-byte AES key.  The iteration count is not stored in the
//!   envelope, so changing it breaks every existing blob.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from `password` + `salt`.  Zeroized on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, PBKDF2_ITERATIONS, key.as_mut_slice())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Generate a fresh random salt.  Not secret; travels inside the envelope.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
