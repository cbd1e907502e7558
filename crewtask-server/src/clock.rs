//! Wall-clock helper for server-set timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as milliseconds since the Unix epoch.
///
/// Saturates at zero for clocks before the epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Current time as seconds since the Unix epoch (token expiry math).
#[must_use]
pub fn now_secs() -> u64 {
    now_millis() / 1000
}
