//! # ringpool-core
//!
//! Core types for the ringpool worker pool.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Thread spawning, configuration and the pool manager itself live in
//! `ringpool-runtime`.
//!
//! ## Modules
//!
//! - `ring` - Power-of-two circular byte buffer
//! - `work` - Fixed-size work record stored in the ring
//! - `state` - Pool lifecycle state
//! - `stats` - Diagnostics snapshot and the `StatsSink` trait
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod ring;
pub mod work;
pub mod state;
pub mod stats;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use ring::RingBuffer;
pub use work::{Job, WorkItem, RECORD_SIZE};
pub use state::PoolState;
pub use stats::{PoolStats, StatsSink};
pub use error::{AllocError, PoolError, PoolResult};
pub use env::{env_get, env_get_bool, env_get_ms, env_get_opt, env_get_str, env_is_set};

/// Library version shown in diagnostics output
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Constants shared by core and runtime
pub mod constants {
    /// Longest accepted pool name, in bytes
    pub const MAX_POOL_NAME_LEN: usize = 31;

    /// Linux limits thread names to 15 bytes plus the terminator
    pub const MAX_THREAD_NAME_LEN: usize = 15;

    /// Hard ceiling on worker threads per pool
    pub const MAX_THREADS: u32 = 1024;

    /// Stack floor used where the platform does not report one
    pub const FALLBACK_MIN_STACK: usize = 16 * 1024;
}
