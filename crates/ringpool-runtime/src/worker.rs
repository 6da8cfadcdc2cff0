//! Worker thread body
//!
//! Each worker repeatedly takes one record from its pool's ring, runs the
//! callback with the pool lock released, and exits once the run flag is
//! cleared.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use ringpool_core::{kdebug, kerror};

use crate::platform;
use crate::pool::Shared;

/// Marks a thread that belongs to no pool
const NO_POOL: u64 = 0;

thread_local! {
    /// Id of the pool this OS thread works for
    static CURRENT_POOL: Cell<u64> = const { Cell::new(NO_POOL) };
}

/// True when the calling thread is a worker of pool `id`.
#[inline]
pub(crate) fn is_worker_of(id: u64) -> bool {
    CURRENT_POOL.with(|c| c.get()) == id
}

/// Entry point of every worker thread.
pub(crate) fn worker_loop(shared: Arc<Shared>, index: u32) {
    CURRENT_POOL.with(|c| c.set(shared.id()));
    kdebug!(
        "pool {}: worker {} started (thread {:#x}, tid {})",
        shared.name(),
        index,
        platform::current_thread_id(),
        platform::current_tid()
    );

    while let Some(item) = shared.next_item() {
        let seq = item.seq();
        let result = panic::catch_unwind(AssertUnwindSafe(move || item.run()));
        if result.is_err() {
            kerror!("pool {}: worker {}: work #{} panicked", shared.name(), index, seq);
        }
        shared.finish_item(result.is_err());
    }

    kdebug!("pool {}: worker {} exiting", shared.name(), index);
    CURRENT_POOL.with(|c| c.set(NO_POOL));
    shared.worker_exited();
}
