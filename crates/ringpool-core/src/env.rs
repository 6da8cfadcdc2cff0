//! Environment overrides for pool configuration
//!
//! ```ignore
//! use ringpool_core::env::{env_get, env_get_ms};
//!
//! let threads: u32 = env_get("RINGPOOL_THREADS", 4);
//! let poll = env_get_ms("RINGPOOL_DRAIN_POLL_MS", Duration::from_millis(10));
//! ```
//!
//! Unset or unparsable variables fall back to the supplied default;
//! a bad value is never an error.

use std::str::FromStr;
use std::time::Duration;

/// Parse `key` as `T`, or return `default`
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T` if set and valid
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Boolean flag: "1", "true", "yes", "on" (any case) are true, anything
/// else set is false, unset is `default`
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// String value, or `default` when unset or empty
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.is_empty() => val,
        _ => default.to_string(),
    }
}

/// Millisecond count as a `Duration`
#[inline]
pub fn env_get_ms(key: &str, default: Duration) -> Duration {
    env_get_opt::<u64>(key)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}
