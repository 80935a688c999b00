//! # Adapters
//!
//! Implementations of the outbound ports.

pub mod clock;
pub mod rate_limiter;
