//! # Token Envelope
//!
//! The structured form of a token before canonical encoding.

use serde::Serialize;
use shared_types::{EpochMillis, Map};

/// Header, payload and metadata of one token.
///
/// The authentication tag covers exactly these five fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenEnvelope {
    /// Format version.
    pub version: u8,
    /// Set by the codec from its clock at generation time.
    pub issued_at: EpochMillis,
    /// Absolute expiry; `None` means the token never expires.
    pub expires_at: Option<EpochMillis>,
    /// Caller data. Never interpreted by the codec.
    pub payload: Map,
    /// Signed side-channel data (purpose tags etc.).
    pub metadata: Option<Map>,
}

impl TokenEnvelope {
    /// Current format version.
    pub const CURRENT_VERSION: u8 = 1;

    /// Build a current-version envelope.
    pub fn new(
        issued_at: EpochMillis,
        expires_at: Option<EpochMillis>,
        payload: Map,
        metadata: Option<Map>,
    ) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            issued_at,
            expires_at,
            payload,
            metadata,
        }
    }

    /// True if `now` is strictly after `expires_at`.
    pub fn is_expired_at(&self, now: EpochMillis) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}
