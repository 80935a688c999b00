//! # Inbound Ports (Driving Side)
//!
//! The public contract of the codec.

use crate::domain::entities::{GenerateRequest, VerificationStatus};
use crate::domain::envelope::TokenEnvelope;
use crate::domain::errors::TokenError;
use shared_types::Map;

/// Token codec API.
///
/// Implementations are `Send + Sync` and meant to be shared behind an `Arc`.
pub trait TokenCodecApi: Send + Sync {
    /// Issue a token for `request.payload`, charged to `request.origin`.
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` if the origin's budget is spent (checked first,
    ///   nothing else is done)
    /// - `MalformedInput` if the payload is empty, nested too deeply, or the
    ///   resulting token exceeds the configured length limit
    fn generate(&self, request: &GenerateRequest) -> Result<String, TokenError>;

    /// Decode a token and return its payload.
    ///
    /// With `require_verification == false` the structure is parsed (and
    /// decrypted if needed) but tag and expiry are not checked.
    fn decode(&self, token: &str, require_verification: bool) -> Result<Map, TokenError>;

    /// Like [`decode`](Self::decode) but returns the whole envelope,
    /// metadata and timestamps included.
    fn decode_envelope(
        &self,
        token: &str,
        require_verification: bool,
    ) -> Result<TokenEnvelope, TokenError>;

    /// Full verification without returning any payload content.
    fn verify(&self, token: &str) -> VerificationStatus;

    /// Boolean form of [`verify`](Self::verify). Never fails; every
    /// rejection, expiry included, is `false`.
    fn verify_signature_only(&self, token: &str) -> bool {
        self.verify(token).is_valid()
    }
}
