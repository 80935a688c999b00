//! # Shared Crypto - Symmetric Token Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `mac` | HMAC-SHA256 | Token authentication tags |
//! | `symmetric` | XChaCha20-Poly1305 | Optional payload confidentiality |
//!
//! ## Security Properties
//!
//! - **HMAC-SHA256**: deterministic 32-byte tags, verified in constant time
//! - **XChaCha20**: 192-bit random nonce per message, AEAD fails closed
//! - **Key material**: zeroized on drop, redacted from `Debug` output

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod mac;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use mac::{sign, verify, MacKey, Tag};
pub use symmetric::{decrypt, encrypt, EncryptionKey, Nonce};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
