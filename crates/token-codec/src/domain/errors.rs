//! # Token Errors
//!
//! Every failure of the codec is one of a small set of distinct, inspectable
//! kinds. Callers react differently to each, so no kind is ever folded into
//! another, and none is retried inside the codec.
//!
//! Error messages never include payload content, decrypted bytes or keys.

use shared_types::EpochMillis;
use thiserror::Error;

/// Errors returned by `generate`, `decode` and friends.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Payload/metadata violate the value model, or the token string cannot
    /// be parsed. Caller bug or corrupted input.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The origin used up its issuance budget for the current window.
    #[error("Rate limit exceeded, retry after {retry_after_ms} ms")]
    RateLimitExceeded { retry_after_ms: u64 },

    /// Ciphertext failed its integrity check. Treated as tampering.
    #[error("Decryption failed")]
    DecryptionFailure,

    /// Authentication tag did not match. Tampering or wrong key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Authentic, but past its `expires_at`.
    #[error("Token expired at {expires_at} (now {now})")]
    Expired {
        expires_at: EpochMillis,
        now: EpochMillis,
    },

    /// Key material refused by the crypto backend. Never expected once the
    /// codec has been constructed from a validated configuration.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TokenError {
    /// True for outcomes that indicate a forged or altered token.
    pub fn is_tamper(&self) -> bool {
        matches!(self, Self::DecryptionFailure | Self::InvalidSignature)
    }

    /// True if the same request may succeed later without changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}
