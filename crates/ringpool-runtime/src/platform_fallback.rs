//! Portable platform support for non-Linux targets

use std::sync::atomic::{AtomicU64, Ordering};

use ringpool_core::constants::FALLBACK_MIN_STACK;

#[inline]
pub fn min_stack_size() -> usize {
    FALLBACK_MIN_STACK
}

/// Process-unique id of the calling thread, for diagnostics
pub fn current_thread_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static ID: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    ID.with(|id| *id)
}

/// No kernel task ids here; reuse the diagnostic id
#[inline]
pub fn current_tid() -> i32 {
    current_thread_id() as i32
}

pub fn worker_thread_name(pool: &str, index: u32) -> String {
    format!("{}-{}", pool, index)
}
