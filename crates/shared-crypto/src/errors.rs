//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
///
/// Messages never carry key bytes or plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Decryption failed (wrong key, tampered ciphertext or nonce)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key is shorter than the accepted minimum
    #[error("Key too short: need at least {minimum} bytes, got {actual}")]
    KeyTooShort {
        /// Minimum key length in bytes
        minimum: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key consists only of zero bytes
    #[error("Key is all zeros")]
    ZeroKey,

    /// Invalid nonce length
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected nonce length in bytes
        expected: usize,
        /// Actual nonce length in bytes
        actual: usize,
    },

    /// Invalid tag length
    #[error("Invalid tag length: expected {expected}, got {actual}")]
    InvalidTagLength {
        /// Expected tag length in bytes
        expected: usize,
        /// Actual tag length in bytes
        actual: usize,
    },

    /// Key is not valid hex
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),
}
