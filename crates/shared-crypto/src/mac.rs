//! # Message Authentication
//!
//! HMAC-SHA256 tags over canonical token bytes.
//!
//! ## Security Properties
//!
//! - Deterministic: the same key and message always produce the same tag
//! - Verification recomputes the tag and compares in constant time; no
//!   short-circuiting byte comparison is ever used on tags
//! - Keys are provisioned from configuration only and zeroized on drop

use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Tag length in bytes.
pub const TAG_LEN: usize = 32;

/// Minimum accepted key length in bytes.
pub const MIN_KEY_LEN: usize = 32;

/// HMAC signing key (at least 256 bits).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MacKey(Vec<u8>);

impl MacKey {
    /// Create from a slice, rejecting short and all-zero keys.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_KEY_LEN {
            return Err(CryptoError::KeyTooShort {
                minimum: MIN_KEY_LEN,
                actual: bytes.len(),
            });
        }
        if bytes.iter().all(|b| *b == 0) {
            return Err(CryptoError::ZeroKey);
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Parse a hex string of at least 64 characters.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Generate random 256-bit key.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; MIN_KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn mac(&self) -> Result<HmacSha256, CryptoError> {
        <HmacSha256 as Mac>::new_from_slice(&self.0).map_err(|_| CryptoError::KeyTooShort {
            minimum: MIN_KEY_LEN,
            actual: self.0.len(),
        })
    }
}

impl fmt::Debug for MacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MacKey(<redacted>)")
    }
}

/// Authentication tag. Equality is constant-time.
#[derive(Clone, Copy)]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice of exactly [`TAG_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CryptoError::InvalidTagLength {
                expected: TAG_LEN,
                actual: bytes.len(),
            })
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}

impl ConstantTimeEq for Tag {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Tag {}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", hex::encode(self.0))
    }
}

/// Compute the HMAC-SHA256 tag of `message`.
///
/// # Errors
///
/// Only fails if the HMAC backend refuses the key, which `MacKey`
/// construction already rules out.
pub fn sign(key: &MacKey, message: &[u8]) -> Result<Tag, CryptoError> {
    let mut mac = key.mac()?;
    mac.update(message);
    Ok(Tag(mac.finalize().into_bytes().into()))
}

/// Check `tag` against a freshly computed tag of `message`.
///
/// # Security
///
/// Uses constant-time comparison to prevent timing attacks.
pub fn verify(key: &MacKey, message: &[u8], tag: &Tag) -> bool {
    let mut mac = match key.mac() {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(tag.as_bytes()).is_ok()
}
