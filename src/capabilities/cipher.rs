//! Encryption helper capability.
//!
//! The application root can carry a cipher for views that persist or ship
//! sensitive values; route resolution never calls it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("ciphertext is malformed: {0}")]
    Malformed(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// `encrypt(plaintext) -> ciphertext`, `decrypt(ciphertext) -> plaintext`.
pub trait Cipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> String;

    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}
