//! # Expiration Validator
//!
//! A token is expired iff it carries `expires_at` and `now > expires_at`.
//! The clock is always passed in.

use crate::domain::envelope::TokenEnvelope;
use crate::domain::errors::TokenError;
use shared_types::EpochMillis;

/// Check the envelope's expiry against `now`.
///
/// # Errors
///
/// `TokenError::Expired` if `expires_at` is present and already passed.
pub fn check_expiry(envelope: &TokenEnvelope, now: EpochMillis) -> Result<(), TokenError> {
    match envelope.expires_at {
        Some(expires_at) if now > expires_at => Err(TokenError::Expired { expires_at, now }),
        _ => Ok(()),
    }
}
