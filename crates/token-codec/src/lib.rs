//! # Token Codec
//!
//! Turns a JSON-compatible payload into a compact, opaque, tamper-evident
//! string for 2D barcodes, and back.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): canonical encoding, wire framing, expiry,
//!   configuration and request validation. Pure, no I/O.
//! - **Ports Layer** (`ports/`): the public codec API and the pluggable
//!   issuance limiter and clock.
//! - **Adapters Layer** (`adapters/`): in-memory per-origin rate limiter,
//!   system and manual clocks.
//! - **Service Layer** (`service.rs`): orchestrates the pipeline.
//!
//! ## Pipelines
//!
//! ```text
//! generate: rate limit → canonicalize → encrypt? → sign → frame → base64url
//! decode:   base64url → frame → decrypt? → verify tag → parse → expiry
//! ```
//!
//! ## Security Notes
//!
//! - Tags are HMAC-SHA256 over the canonical plaintext and compared in
//!   constant time.
//! - Only generation consumes rate-limit budget; decoding is never limited.
//! - Decrypted plaintext is wiped from memory when a token is rejected.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::clock::{ManualClock, SystemClock};
pub use adapters::rate_limiter::InMemoryRateLimiter;
pub use domain::canonical::{canonicalize, parse_canonical, MAX_NESTING_DEPTH};
pub use domain::config::{CodecConfig, ConfigError, LimitsConfig, RateLimitConfig, SecurityConfig};
pub use domain::entities::{GenerateRequest, VerificationStatus};
pub use domain::envelope::TokenEnvelope;
pub use domain::errors::TokenError;
pub use domain::expiry::check_expiry;
pub use domain::keys::CodecKeys;
pub use domain::validation::{
    validate_expiry, validate_generate_request, validate_metadata, validate_origin,
    validate_payload,
};
pub use domain::wire::TokenFrame;
pub use ports::inbound::TokenCodecApi;
pub use ports::outbound::{Clock, IssuanceLimiter, RateDecision};
pub use service::TokenCodecService;
