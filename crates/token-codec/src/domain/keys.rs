//! # Key Material
//!
//! Secrets the codec holds for its whole lifetime. Loaded once from
//! configuration, never from caller input, zeroized on drop.

use shared_crypto::{EncryptionKey, MacKey};

/// Signing key plus the optional encryption key.
///
/// `Debug` output of both keys is redacted.
#[derive(Debug, Clone)]
pub struct CodecKeys {
    /// HMAC-SHA256 key (at least 32 bytes).
    pub signing: MacKey,
    /// XChaCha20-Poly1305 key. Required when encryption is enabled; when
    /// disabled it is still used to open encrypted tokens on decode.
    pub encryption: Option<EncryptionKey>,
}

impl CodecKeys {
    /// Keys for an authenticated-only codec.
    pub fn signing_only(signing: MacKey) -> Self {
        Self {
            signing,
            encryption: None,
        }
    }

    /// Keys for a codec that also encrypts.
    pub fn with_encryption(signing: MacKey, encryption: EncryptionKey) -> Self {
        Self {
            signing,
            encryption: Some(encryption),
        }
    }

    /// Fresh random keys, for tests and `keygen`.
    pub fn generate() -> Self {
        Self::with_encryption(MacKey::generate(), EncryptionKey::generate())
    }
}
