//! # ringpool-runtime
//!
//! Pool manager and worker threads for ringpool.
//!
//! This crate provides:
//! - `ThreadPool`: fixed worker set over a shared ring of work records
//! - Worker spawning through the `WorkerSpawner` seam
//! - Configuration (build-time defaults, env overrides, builder)
//! - A process-wide pool in `global`
//! - `TablePrinter`, a text `StatsSink`

pub mod config;
pub mod spawn;
pub mod pool;
pub mod global;
pub mod table;
mod worker;

// Re-exports
pub use config::{ConfigError, PoolConfig};
pub use pool::ThreadPool;
pub use spawn::{OsSpawner, WorkerSpawner};
pub use table::TablePrinter;

// Platform detection
cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod platform_linux;
        use platform_linux as platform;
    } else {
        mod platform_fallback;
        use platform_fallback as platform;
    }
}
