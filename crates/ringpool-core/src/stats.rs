//! Diagnostics snapshot and the sink that renders it.
//!
//! The pool only produces `PoolStats`; formatting is the sink's job.

use crate::state::PoolState;
use crate::work::RECORD_SIZE;

/// Point-in-time counters of one pool, copied under the pool lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Pool name from the configuration
    pub name: String,
    /// Lifecycle state at snapshot time
    pub state: PoolState,
    /// Configured worker count
    pub max_threads: u32,
    /// Workers still alive
    pub live_threads: u32,
    /// Workers currently inside a callback
    pub busy_threads: u32,
    /// Configured queue depth, in records
    pub max_queue: u32,
    /// Records waiting in the ring
    pub used_queue: u32,
    /// Cumulative bytes pushed into the ring
    pub bytes_published: u64,
    /// Cumulative bytes popped by workers
    pub bytes_consumed: u64,
    /// Callbacks that panicked
    pub panicked: u64,
}

impl PoolStats {
    /// Records published since creation
    #[inline]
    pub fn items_published(&self) -> u64 {
        self.bytes_published / RECORD_SIZE as u64
    }

    /// Records consumed since creation
    #[inline]
    pub fn items_consumed(&self) -> u64 {
        self.bytes_consumed / RECORD_SIZE as u64
    }

    /// Workers alive but waiting for work
    #[inline]
    pub fn idle_threads(&self) -> u32 {
        self.live_threads.saturating_sub(self.busy_threads)
    }
}

/// Renders a stats snapshot (console table, log line, metrics push...).
pub trait StatsSink {
    fn render(&mut self, stats: &PoolStats);
}

impl<F> StatsSink for F
where
    F: FnMut(&PoolStats),
{
    fn render(&mut self, stats: &PoolStats) {
        self(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PoolStats {
        PoolStats {
            name: "p".into(),
            state: PoolState::Running,
            max_threads: 4,
            live_threads: 4,
            busy_threads: 1,
            max_queue: 8,
            used_queue: 2,
            bytes_published: 10 * RECORD_SIZE as u64,
            bytes_consumed: 8 * RECORD_SIZE as u64,
            panicked: 0,
        }
    }

    #[test]
    fn test_derived_counts() {
        let s = sample();
        assert_eq!(s.items_published(), 10);
        assert_eq!(s.items_consumed(), 8);
        assert_eq!(s.idle_threads(), 3);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |s: &PoolStats| seen.push(s.used_queue);
        sink.render(&sample());
        assert_eq!(seen, vec![2]);
    }
}
