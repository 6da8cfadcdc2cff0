//! Worker thread creation.
//!
//! The pool never spawns threads directly; it goes through a
//! `WorkerSpawner`. The default `OsSpawner` creates a named, detached OS
//! thread with the configured stack size. Other implementations can pin
//! threads, set scheduling policy, or fail on purpose in tests.

use std::io;
use std::thread;

use ringpool_core::Job;

/// Creates one worker thread per call.
///
/// **Contract:**
/// - On `Ok`, `body` is running (or will run) on a new thread.
/// - On `Err`, `body` has been dropped without running.
/// - Workers are detached: the pool tracks them through its live
///   counter, never through a join handle.
pub trait WorkerSpawner: Send + Sync {
    fn spawn(&self, index: u32, name: String, stack_size: usize, body: Job) -> io::Result<()>;
}

/// Spawns plain OS threads through `std::thread::Builder`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSpawner;

impl WorkerSpawner for OsSpawner {
    fn spawn(&self, _index: u32, name: String, stack_size: usize, body: Job) -> io::Result<()> {
        // Dropping the JoinHandle detaches the thread.
        thread::Builder::new()
            .name(name)
            .stack_size(stack_size)
            .spawn(body)
            .map(drop)
    }
}
