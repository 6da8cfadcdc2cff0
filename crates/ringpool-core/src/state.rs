//! Pool lifecycle state

use core::fmt;

/// Lifecycle state of a pool instance
///
/// ```text
/// Uninitialized -> Starting -> Running -> Stopping -> Stopped
///                      |                                 ^
///                      +------- (spawn failure) ---------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    /// Not yet created
    Uninitialized = 0,

    /// Ring allocated, workers being spawned
    Starting = 1,

    /// Accepting work
    Running = 2,

    /// Shutdown requested, waiting for workers to exit
    Stopping = 3,

    /// All workers gone, ring freed
    Stopped = 4,
}

impl PoolState {
    /// Check if submissions are accepted in this state
    #[inline]
    pub const fn accepts_work(&self) -> bool {
        matches!(self, PoolState::Running)
    }

    /// Check if the pool has begun or finished tearing down
    #[inline]
    pub const fn is_terminating(&self) -> bool {
        matches!(self, PoolState::Stopping | PoolState::Stopped)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PoolState::Uninitialized => "uninitialized",
            PoolState::Starting => "starting",
            PoolState::Running => "running",
            PoolState::Stopping => "stopping",
            PoolState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_accepts_work() {
        assert!(PoolState::Running.accepts_work());
        assert!(!PoolState::Starting.accepts_work());
        assert!(!PoolState::Stopping.accepts_work());
        assert!(!PoolState::Stopped.accepts_work());
    }

    #[test]
    fn test_display() {
        assert_eq!(PoolState::Running.to_string(), "running");
        assert!(PoolState::Stopping.is_terminating());
        assert!(!PoolState::Starting.is_terminating());
    }
}
