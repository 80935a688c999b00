//! Per-origin fixed-window issuance limiter.
//!
//! Buckets live in a sharded `DashMap`, so the check-and-increment for one
//! origin holds only that origin's shard lock and different origins do not
//! contend on a global lock. Idle buckets are swept every
//! `sweep_interval` calls, or on demand via [`InMemoryRateLimiter::evict_idle`].

use crate::domain::config::RateLimitConfig;
use crate::ports::outbound::{IssuanceLimiter, RateDecision};
use dashmap::DashMap;
use shared_types::EpochMillis;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Window state for one origin
#[derive(Debug, Clone, Copy)]
struct Bucket {
    /// Start of the current window
    window_start: EpochMillis,
    /// Attempts in the current window, rejected ones included
    count: u32,
    /// Last attempt (for eviction)
    last_seen: EpochMillis,
}

/// In-process issuance limiter
pub struct InMemoryRateLimiter {
    /// Per-origin buckets
    buckets: DashMap<String, Bucket>,
    /// Configuration
    config: RateLimitConfig,
    /// Calls since construction, drives the opportunistic sweep
    calls: AtomicU64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
            calls: AtomicU64::new(0),
        }
    }

    /// Drop buckets idle for at least `idle_eviction_factor` windows.
    /// Returns how many were removed.
    pub fn evict_idle(&self, now: EpochMillis) -> usize {
        let ttl = self.config.idle_ttl_ms();
        let before = self.buckets.len();
        self.buckets.retain(|origin, bucket| {
            let idle = now.saturating_sub(bucket.last_seen);
            if idle >= ttl {
                debug!(origin = %origin, idle_ms = idle, "Removing idle rate limit bucket");
                false
            } else {
                true
            }
        });
        before.saturating_sub(self.buckets.len())
    }

    /// Get number of tracked origins
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Configuration in effect
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn maybe_sweep(&self, now: EpochMillis) {
        let interval = self.config.sweep_interval;
        if interval == 0 {
            return;
        }
        let calls = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if calls % interval == 0 {
            self.evict_idle(now);
        }
    }
}

impl IssuanceLimiter for InMemoryRateLimiter {
    fn allow(&self, origin: &str, now: EpochMillis) -> RateDecision {
        // Sweep before taking an entry: `retain` locks every shard.
        self.maybe_sweep(now);

        let window = self.config.window_ms;
        let max = self.config.max_requests;

        let mut bucket = self.buckets.entry(origin.to_owned()).or_insert_with(|| {
            debug!(origin = %origin, "Creating new rate limit bucket");
            Bucket {
                window_start: now,
                count: 0,
                last_seen: now,
            }
        });

        if now.saturating_sub(bucket.window_start) >= window {
            bucket.window_start = now;
            bucket.count = 0;
        }
        bucket.count = bucket.count.saturating_add(1);
        bucket.last_seen = now;

        if bucket.count <= max {
            return RateDecision::Allowed;
        }

        let retry_after_ms = bucket
            .window_start
            .saturating_add(window)
            .saturating_sub(now);
        warn!(
            origin = %origin,
            attempts = bucket.count,
            retry_after_ms,
            "Issuance rate limit exceeded"
        );
        RateDecision::Limited { retry_after_ms }
    }
}
