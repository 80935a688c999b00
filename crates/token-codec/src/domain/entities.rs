//! # Domain Entities
//!
//! Request and result types of the codec API.

use crate::domain::errors::TokenError;
use serde::{Deserialize, Serialize};
use shared_types::{EpochMillis, Map};
use std::fmt;

/// Everything `generate` needs besides the codec's own keys and clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Identifier the issuance budget is charged to.
    pub origin: String,
    /// Caller data to carry in the token.
    pub payload: Map,
    /// Signed side-channel data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map>,
    /// Absolute expiry in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<EpochMillis>,
}

impl GenerateRequest {
    /// Request with no metadata and no expiry.
    pub fn new(origin: impl Into<String>, payload: Map) -> Self {
        Self {
            origin: origin.into(),
            payload,
            metadata: None,
            expires_at: None,
        }
    }

    /// Attach signed metadata.
    pub fn with_metadata(mut self, metadata: Map) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set an absolute expiry.
    pub fn expires_at(mut self, at: EpochMillis) -> Self {
        self.expires_at = Some(at);
        self
    }
}

/// Outcome of a verify-only check. Carries no payload content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Authentic and unexpired.
    Valid,
    /// Authentic but past its expiry.
    Expired,
    /// Tag mismatch.
    InvalidSignature,
    /// Ciphertext failed its integrity check, or no key to open it.
    DecryptionFailure,
    /// Not a token at all.
    Malformed,
}

impl VerificationStatus {
    /// True only for [`VerificationStatus::Valid`].
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

impl From<&TokenError> for VerificationStatus {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::Expired { .. } => Self::Expired,
            TokenError::InvalidSignature => Self::InvalidSignature,
            TokenError::DecryptionFailure => Self::DecryptionFailure,
            // Decode never rate limits; both remaining kinds mean the token
            // could not be processed.
            TokenError::MalformedInput(_)
            | TokenError::RateLimitExceeded { .. }
            | TokenError::Internal(_) => Self::Malformed,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::InvalidSignature => "invalid_signature",
            Self::DecryptionFailure => "decryption_failure",
            Self::Malformed => "malformed",
        })
    }
}
