use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("AEAD encryption failed")]
    Encrypt,

    /// Wrong password and tampered ciphertext are deliberately the same error.
    #[error("Decryption failed: wrong password or corrupted data")]
    Decrypt,

    #[error("Envelope too short: {0} bytes")]
    Malformed(usize),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
