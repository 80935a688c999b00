//! # Request Validation
//!
//! Explicit checks callers run on untrusted input before handing it to the
//! codec. `generate` itself re-applies only the structural payload checks;
//! origin hygiene and "expiry not in the past" are policy and live here.

use crate::domain::entities::GenerateRequest;
use crate::domain::errors::TokenError;
use shared_types::{EpochMillis, Map};

/// Longest accepted origin identifier, in bytes.
pub const MAX_ORIGIN_LEN: usize = 256;

/// Origin must be non-empty, at most [`MAX_ORIGIN_LEN`] bytes, and free of
/// control characters.
pub fn validate_origin(origin: &str) -> Result<(), TokenError> {
    if origin.is_empty() {
        return Err(TokenError::malformed("origin is empty"));
    }
    if origin.len() > MAX_ORIGIN_LEN {
        return Err(TokenError::malformed(format!(
            "origin is {} bytes, limit is {MAX_ORIGIN_LEN}",
            origin.len()
        )));
    }
    if origin.chars().any(char::is_control) {
        return Err(TokenError::malformed("origin contains control characters"));
    }
    Ok(())
}

/// Payload must be a non-empty mapping nested no deeper than `max_depth`.
pub fn validate_payload(payload: &Map, max_depth: usize) -> Result<(), TokenError> {
    if payload.is_empty() {
        return Err(TokenError::malformed("payload is empty"));
    }
    validate_depth("payload", payload, max_depth)
}

/// Metadata may be empty but obeys the same nesting limit as the payload.
pub fn validate_metadata(metadata: Option<&Map>, max_depth: usize) -> Result<(), TokenError> {
    match metadata {
        Some(map) => validate_depth("metadata", map, max_depth),
        None => Ok(()),
    }
}

/// Expiry, if set, must not be before `now`.
pub fn validate_expiry(expires_at: Option<EpochMillis>, now: EpochMillis) -> Result<(), TokenError> {
    match expires_at {
        Some(at) if at < now => Err(TokenError::malformed(format!(
            "expires_at {at} is in the past (now {now})"
        ))),
        _ => Ok(()),
    }
}

/// All of the above for one request.
pub fn validate_generate_request(
    request: &GenerateRequest,
    now: EpochMillis,
    max_depth: usize,
) -> Result<(), TokenError> {
    validate_origin(&request.origin)?;
    validate_payload(&request.payload, max_depth)?;
    validate_metadata(request.metadata.as_ref(), max_depth)?;
    validate_expiry(request.expires_at, now)
}

/// The mapping itself counts as one level.
fn validate_depth(what: &str, map: &Map, max_depth: usize) -> Result<(), TokenError> {
    let limit = max_depth.saturating_sub(1);
    if max_depth == 0 || map.values().any(|value| value.depth_exceeds(limit)) {
        return Err(TokenError::malformed(format!(
            "{what} nesting depth exceeds {max_depth}"
        )));
    }
    Ok(())
}
