//! # Time Primitives
//!
//! All timestamps in tokens are integer milliseconds since the Unix epoch.
//! Wall-clock reads are confined to [`now_epoch_millis`]; everything else takes
//! `now` as an argument so that tests can drive time explicitly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since 1970-01-01T00:00:00Z.
pub type EpochMillis = u64;

/// Current wall-clock time in epoch milliseconds.
///
/// A clock set before the epoch reads as `0`; a clock beyond `u64::MAX` ms
/// saturates.
pub fn now_epoch_millis() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_to_millis)
        .unwrap_or(0)
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`.
pub fn duration_to_millis(duration: Duration) -> EpochMillis {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
