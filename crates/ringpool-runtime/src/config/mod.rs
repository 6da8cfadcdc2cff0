//! Pool configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (`from_env()` only)
//! 3. User's defaults file named by `RINGPOOL_CONFIG_RS` at build time
//! 4. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use ringpool_runtime::config::PoolConfig;
//!
//! let config = PoolConfig::from_env()
//!     .max_thread_nums(8)
//!     .msg_node_max(256)
//!     .pool_name("net-rx");
//! ```

pub mod defaults;

use std::fmt;
use std::time::Duration;

use ringpool_core::constants::{MAX_POOL_NAME_LEN, MAX_THREADS};
use ringpool_core::env::{env_get, env_get_ms, env_get_str};
use ringpool_core::{PoolError, RECORD_SIZE};

use crate::platform;

/// Pool configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads
    pub max_thread_nums: u32,
    /// Queue depth, in work records
    pub msg_node_max: u32,
    /// Stack size of each worker, in bytes
    pub thread_stack_size: u32,
    /// Human-readable name, at most 31 bytes
    pub pool_name: String,
    /// Upper bound between liveness checks while draining
    pub drain_poll_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PoolConfig {
    /// Compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `RINGPOOL_THREADS` - Number of worker threads
    /// - `RINGPOOL_QUEUE_DEPTH` - Queue depth in records
    /// - `RINGPOOL_STACK_SIZE` - Worker stack size in bytes
    /// - `RINGPOOL_NAME` - Pool name
    /// - `RINGPOOL_DRAIN_POLL_MS` - Drain poll interval in milliseconds
    pub fn from_env() -> Self {
        let base = Self::new();
        Self {
            max_thread_nums: env_get("RINGPOOL_THREADS", base.max_thread_nums),
            msg_node_max: env_get("RINGPOOL_QUEUE_DEPTH", base.msg_node_max),
            thread_stack_size: env_get("RINGPOOL_STACK_SIZE", base.thread_stack_size),
            pool_name: env_get_str("RINGPOOL_NAME", &base.pool_name),
            drain_poll_interval: env_get_ms("RINGPOOL_DRAIN_POLL_MS", base.drain_poll_interval),
        }
    }

    /// Library defaults only, no environment lookups.
    pub fn new() -> Self {
        Self {
            max_thread_nums: defaults::THREAD_NUMS,
            msg_node_max: defaults::MSG_NODE_MAX,
            thread_stack_size: defaults::THREAD_STACK_SIZE,
            pool_name: defaults::POOL_NAME.to_string(),
            drain_poll_interval: Duration::from_millis(defaults::DRAIN_POLL_MS),
        }
    }

    // Builder methods

    pub fn max_thread_nums(mut self, n: u32) -> Self {
        self.max_thread_nums = n;
        self
    }

    pub fn msg_node_max(mut self, n: u32) -> Self {
        self.msg_node_max = n;
        self
    }

    pub fn thread_stack_size(mut self, bytes: u32) -> Self {
        self.thread_stack_size = bytes;
        self
    }

    pub fn pool_name(mut self, name: impl Into<String>) -> Self {
        self.pool_name = name.into();
        self
    }

    pub fn drain_poll_interval(mut self, d: Duration) -> Self {
        self.drain_poll_interval = d;
        self
    }

    /// Ring bytes requested for this queue depth, before power-of-two
    /// rounding. `None` if the rounded size would not fit 32-bit cursors.
    pub fn ring_bytes(&self) -> Option<u32> {
        let bytes = (RECORD_SIZE as u32).checked_mul(self.msg_node_max)?;
        bytes.checked_next_power_of_two()?;
        Some(bytes)
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_thread_nums == 0 {
            return Err(ConfigError::InvalidValue("max_thread_nums must be > 0"));
        }
        if self.max_thread_nums > MAX_THREADS {
            return Err(ConfigError::InvalidValue("max_thread_nums must be <= 1024"));
        }
        if self.msg_node_max == 0 {
            return Err(ConfigError::InvalidValue("msg_node_max must be > 0"));
        }
        if self.ring_bytes().is_none() {
            return Err(ConfigError::InvalidValue("msg_node_max too large for a 32-bit ring"));
        }
        if (self.thread_stack_size as usize) < platform::min_stack_size() {
            return Err(ConfigError::InvalidValue(
                "thread_stack_size below platform minimum",
            ));
        }
        if self.pool_name.is_empty() {
            return Err(ConfigError::InvalidValue("pool_name must not be empty"));
        }
        if self.pool_name.len() > MAX_POOL_NAME_LEN {
            return Err(ConfigError::InvalidValue("pool_name longer than 31 bytes"));
        }
        // Becomes the OS thread name, which cannot carry a NUL
        if self.pool_name.contains('\0') {
            return Err(ConfigError::InvalidValue("pool_name contains a NUL byte"));
        }
        if self.drain_poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue("drain_poll_interval must be > 0"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("ringpool configuration:");
        eprintln!("  pool_name:            {}", self.pool_name);
        eprintln!("  max_thread_nums:      {}", self.max_thread_nums);
        eprintln!("  msg_node_max:         {}", self.msg_node_max);
        eprintln!("  thread_stack_size:    {}", self.thread_stack_size);
        eprintln!("  drain_poll_interval:  {:?}", self.drain_poll_interval);
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PoolError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue(msg) => PoolError::InvalidArgument(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PoolConfig {
        PoolConfig::new()
            .max_thread_nums(2)
            .msg_node_max(16)
            .thread_stack_size(256 * 1024)
            .pool_name("test")
    }

    #[test]
    fn test_library_defaults_validate() {
        let config = PoolConfig::new();
        assert_eq!(config.pool_name, defaults::POOL_NAME);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = valid().drain_poll_interval(Duration::from_millis(3));
        assert_eq!(config.max_thread_nums, 2);
        assert_eq!(config.msg_node_max, 16);
        assert_eq!(config.pool_name, "test");
        assert_eq!(config.drain_poll_interval, Duration::from_millis(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(valid().max_thread_nums(0).validate().is_err());
        assert!(valid().max_thread_nums(MAX_THREADS + 1).validate().is_err());
        assert!(valid().msg_node_max(0).validate().is_err());
        assert!(valid().msg_node_max(u32::MAX).validate().is_err());
        assert!(valid().thread_stack_size(1).validate().is_err());
        assert!(valid().pool_name("").validate().is_err());
        assert!(valid().pool_name("x".repeat(32)).validate().is_err());
        assert!(valid().pool_name("x".repeat(31)).validate().is_ok());
        assert_eq!(
            valid().pool_name("a\0b").validate(),
            Err(ConfigError::InvalidValue("pool_name contains a NUL byte"))
        );
        assert!(valid().drain_poll_interval(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_ring_bytes() {
        assert_eq!(valid().msg_node_max(10).ring_bytes(), Some(10 * RECORD_SIZE as u32));
        assert_eq!(valid().msg_node_max(u32::MAX / 2).ring_bytes(), None);
    }

    #[test]
    fn test_error_converts_to_invalid_argument() {
        let err: PoolError = valid().msg_node_max(0).validate().unwrap_err().into();
        assert_eq!(err, PoolError::InvalidArgument("msg_node_max must be > 0"));
    }

    #[test]
    fn test_from_env_override() {
        std::env::set_var("RINGPOOL_QUEUE_DEPTH", "333");
        let config = PoolConfig::from_env();
        std::env::remove_var("RINGPOOL_QUEUE_DEPTH");
        assert_eq!(config.msg_node_max, 333);
    }
}
