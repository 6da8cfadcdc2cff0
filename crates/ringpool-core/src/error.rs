//! Error types for the worker pool

use core::fmt;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur in pool operations
///
/// Every failure is reported through a return value. The only exception
/// is a corrupted internal counter, which aborts via `kfatal!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Bad configuration or argument
    InvalidArgument(&'static str),

    /// Ring buffer or instance memory could not be obtained
    AllocationFailure(AllocError),

    /// A worker thread could not be created during startup.
    /// The partially started pool has been fully rolled back.
    ThreadSpawnFailure {
        /// Index of the worker that failed to spawn
        worker: u32,
        /// OS error code, when the platform reported one
        os_error: Option<i32>,
    },

    /// Submission rejected, no room for one more record
    QueueFull,

    /// Pool is not in the running state
    NotStarted,

    /// Process-wide pool was already started
    AlreadyStarted,
}

impl PoolError {
    /// Whether the caller may retry the same operation later
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PoolError::QueueFull)
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            PoolError::AllocationFailure(e) => write!(f, "allocation failure: {}", e),
            PoolError::ThreadSpawnFailure { worker, os_error: Some(code) } => {
                write!(f, "failed to spawn worker {}: os error {}", worker, code)
            }
            PoolError::ThreadSpawnFailure { worker, os_error: None } => {
                write!(f, "failed to spawn worker {}", worker)
            }
            PoolError::QueueFull => write!(f, "work queue full"),
            PoolError::NotStarted => write!(f, "thread pool not started"),
            PoolError::AlreadyStarted => write!(f, "thread pool already started"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Ring buffer allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Requested capacity was zero
    ZeroCapacity,

    /// Rounded capacity does not fit the 32-bit cursor width
    CapacityOverflow,

    /// The allocator refused the reservation
    OutOfMemory,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::ZeroCapacity => write!(f, "zero capacity requested"),
            AllocError::CapacityOverflow => write!(f, "capacity exceeds 32-bit cursor range"),
            AllocError::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl From<AllocError> for PoolError {
    fn from(e: AllocError) -> Self {
        PoolError::AllocationFailure(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PoolError::QueueFull;
        assert_eq!(format!("{}", e), "work queue full");

        let e = PoolError::AllocationFailure(AllocError::OutOfMemory);
        assert_eq!(format!("{}", e), "allocation failure: out of memory");

        let e = PoolError::ThreadSpawnFailure { worker: 3, os_error: Some(11) };
        assert_eq!(format!("{}", e), "failed to spawn worker 3: os error 11");
    }

    #[test]
    fn test_error_conversion() {
        let pool_err: PoolError = AllocError::CapacityOverflow.into();
        assert!(matches!(
            pool_err,
            PoolError::AllocationFailure(AllocError::CapacityOverflow)
        ));
    }

    #[test]
    fn test_recoverable() {
        assert!(PoolError::QueueFull.is_recoverable());
        assert!(!PoolError::NotStarted.is_recoverable());
        assert!(!PoolError::InvalidArgument("x").is_recoverable());
    }
}
