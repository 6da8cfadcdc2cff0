//! # ringpool - embeddable worker pool
//!
//! A fixed set of OS worker threads fed from a bounded FIFO of work
//! records. Submission never blocks: when the queue is full the caller
//! gets `PoolError::QueueFull` and decides what to do.
//!
//! ## Features
//!
//! - **Bounded**: queue depth fixed at creation, backpressure by error
//! - **Clean teardown**: shutdown waits for every worker, in-flight
//!   callbacks complete and queued ones are discarded
//! - **All or nothing start**: a worker that fails to spawn rolls back
//!   the ones already running
//! - **Two flavors**: independent `ThreadPool` handles, or one
//!   process-wide pool in `global`
//!
//! ## Quick Start
//!
//! ```ignore
//! use ringpool::{PoolConfig, PoolError, ThreadPool, TablePrinter};
//!
//! fn main() -> Result<(), PoolError> {
//!     let pool = ThreadPool::create(
//!         PoolConfig::from_env()
//!             .max_thread_nums(4)
//!             .msg_node_max(128)
//!             .pool_name("ingest"),
//!     )?;
//!
//!     for i in 0..10 {
//!         match pool.add_work(move || println!("job {}", i)) {
//!             Ok(()) => {}
//!             Err(PoolError::QueueFull) => eprintln!("dropped job {}", i),
//!             Err(e) => return Err(e),
//!         }
//!     }
//!
//!     pool.show(&mut TablePrinter::new());
//!     pool.destroy()
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   add_work    ┌─────────────────────────────┐
//! │  Submitters  │ ────────────▶ │  RingBuffer (2^n bytes)     │
//! └──────────────┘  notify_one   │  records: [job ptr | seq]   │
//!                                └─────────────────────────────┘
//!                                     │ pop under pool mutex
//!          ┌──────────────────────────┼──────────────────────────┐
//!          ▼                          ▼                          ▼
//!    ┌───────────┐             ┌───────────┐             ┌───────────┐
//!    │  Worker 0 │             │  Worker 1 │     ...     │  Worker N │
//!    └───────────┘             └───────────┘             └───────────┘
//!        callbacks run unlocked, exit broadcast on shutdown
//! ```

// Re-export core types
pub use ringpool_core::{
    AllocError,
    Job,
    PoolError,
    PoolResult,
    PoolState,
    PoolStats,
    RingBuffer,
    StatsSink,
    WorkItem,
    RECORD_SIZE,
    VERSION,
};

// Re-export kprint macros for debug logging
pub use ringpool_core::{kprint, kprintln, kerror, kwarn, kinfo, kdebug, ktrace, kfatal};
pub use ringpool_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use ringpool_core::{env_get, env_get_bool, env_get_ms, env_get_opt, env_get_str, env_is_set};

// Re-export runtime types
pub use ringpool_runtime::{
    global,
    ConfigError,
    OsSpawner,
    PoolConfig,
    TablePrinter,
    ThreadPool,
    WorkerSpawner,
};

/// Create a pool from compile-time defaults and `RINGPOOL_*` overrides.
pub fn from_env() -> PoolResult<ThreadPool> {
    ThreadPool::create(PoolConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    #[test]
    fn test_facade_end_to_end() {
        set_log_level(LogLevel::Off);
        let pool = ThreadPool::create(
            PoolConfig::new()
                .max_thread_nums(2)
                .msg_node_max(8)
                .pool_name("facade"),
        )
        .unwrap();

        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let h = Arc::clone(&hits);
            pool.add_work(move || {
                h.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while hits.load(Ordering::SeqCst) < 4 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 4);

        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let out = Arc::clone(&lines);
        let mut table = TablePrinter::new();
        table.set_output(move |l| out.lock().unwrap().push(l.to_string()));
        pool.show(&mut table);
        assert!(lines.lock().unwrap().iter().any(|l| l.contains("ringpool: facade")));

        pool.destroy().unwrap();
    }
}
