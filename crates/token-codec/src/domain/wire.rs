//! # Wire Format
//!
//! The encoded token is unpadded base64url of a binary frame:
//!
//! ```text
//! +---------+-------+----------------------+----------------+-----------+
//! | version | flags | nonce (24B, if ENC)  | body           | tag (32B) |
//! |   u8    |  u8   |                      | canonical / ct | HMAC      |
//! +---------+-------+----------------------+----------------+-----------+
//! ```
//!
//! The body length is implied by the frame length. The frame carries enough
//! header to decode it without outside context; the base64url alphabet fits
//! any 2D barcode byte mode.

use crate::domain::envelope::TokenEnvelope;
use crate::domain::errors::TokenError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use shared_crypto::mac::TAG_LEN;
use shared_crypto::symmetric::NONCE_LEN;
use shared_crypto::{Nonce, Tag};

/// Flag bit: body is XChaCha20-Poly1305 ciphertext preceded by its nonce.
pub const FLAG_ENCRYPTED: u8 = 0b0000_0001;

/// Every flag bit this version understands.
const KNOWN_FLAGS: u8 = FLAG_ENCRYPTED;

/// Version byte plus flags byte.
const HEADER_LEN: usize = 2;

/// A parsed but not yet verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFrame {
    /// Format version from the header byte.
    pub version: u8,
    /// Present iff the body is encrypted.
    pub nonce: Option<Nonce>,
    /// Canonical bytes, or their ciphertext.
    pub body: Vec<u8>,
    /// HMAC over the canonical (plaintext) bytes.
    pub tag: Tag,
}

impl TokenFrame {
    /// True if the frame's body is ciphertext.
    pub fn is_encrypted(&self) -> bool {
        self.nonce.is_some()
    }

    fn flags(&self) -> u8 {
        if self.is_encrypted() {
            FLAG_ENCRYPTED
        } else {
            0
        }
    }

    /// Serialize to the binary frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let nonce_len = if self.is_encrypted() { NONCE_LEN } else { 0 };
        let mut out = Vec::with_capacity(HEADER_LEN + nonce_len + self.body.len() + TAG_LEN);
        out.push(self.version);
        out.push(self.flags());
        if let Some(nonce) = &self.nonce {
            out.extend_from_slice(nonce.as_bytes());
        }
        out.extend_from_slice(&self.body);
        out.extend_from_slice(self.tag.as_bytes());
        out
    }

    /// Parse a binary frame.
    ///
    /// # Errors
    ///
    /// `TokenError::MalformedInput` for unknown versions or flags and for
    /// frames too short to hold their header, nonce and tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() < HEADER_LEN + TAG_LEN {
            return Err(TokenError::malformed(format!(
                "token frame too short: {} bytes",
                bytes.len()
            )));
        }

        let version = bytes[0];
        if version != TokenEnvelope::CURRENT_VERSION {
            return Err(TokenError::malformed(format!(
                "unsupported token version {version}"
            )));
        }

        let flags = bytes[1];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(TokenError::malformed(format!(
                "unknown token flags {flags:#04x}"
            )));
        }

        let (rest, tag_bytes) = bytes[HEADER_LEN..].split_at(bytes.len() - HEADER_LEN - TAG_LEN);
        let tag = Tag::from_slice(tag_bytes).map_err(|e| TokenError::malformed(e.to_string()))?;

        let (nonce, body) = if flags & FLAG_ENCRYPTED != 0 {
            if rest.len() < NONCE_LEN {
                return Err(TokenError::malformed("encrypted token frame too short"));
            }
            let (nonce_bytes, body) = rest.split_at(NONCE_LEN);
            let nonce =
                Nonce::from_slice(nonce_bytes).map_err(|e| TokenError::malformed(e.to_string()))?;
            (Some(nonce), body)
        } else {
            (None, rest)
        };

        Ok(Self {
            version,
            nonce,
            body: body.to_vec(),
            tag,
        })
    }

    /// Encode as unpadded base64url text.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decode from base64url text. Surrounding whitespace (as added by some
    /// barcode scanners) is ignored.
    ///
    /// # Errors
    ///
    /// `TokenError::MalformedInput` if the text is not canonical unpadded
    /// base64url or the frame is invalid.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| TokenError::malformed(format!("token is not base64url: {e}")))?;
        Self::from_bytes(&bytes)
    }
}
