//! # Outbound Ports (Driven Side)
//!
//! Dependencies the codec needs from its host: a time source and an
//! issuance limiter. Both are injected so tests can control time and
//! deployments can share rate-limit state across processes.

use shared_types::EpochMillis;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is within budget.
    Allowed,
    /// Budget exhausted for the current window.
    Limited {
        /// Milliseconds until the window resets.
        retry_after_ms: u64,
    },
}

impl RateDecision {
    /// True if the request may proceed.
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Per-origin issuance budget.
///
/// Implementations must make the check-and-count step atomic per origin.
pub trait IssuanceLimiter: Send + Sync {
    /// Count one generation attempt for `origin` at `now` and decide.
    fn allow(&self, origin: &str, now: EpochMillis) -> RateDecision;
}

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now_millis(&self) -> EpochMillis;
}
