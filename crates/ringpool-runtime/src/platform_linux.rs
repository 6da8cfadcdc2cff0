//! Linux platform support

use ringpool_core::constants::MAX_THREAD_NAME_LEN;

/// Smallest stack glibc/musl will accept for a new thread
#[inline]
pub fn min_stack_size() -> usize {
    libc::PTHREAD_STACK_MIN
}

/// pthread id of the calling thread, for diagnostics
#[inline]
pub fn current_thread_id() -> u64 {
    nix::sys::pthread::pthread_self() as u64
}

/// Kernel task id of the calling thread (what `top -H` shows)
#[inline]
pub fn current_tid() -> i32 {
    nix::unistd::gettid().as_raw()
}

/// `<pool>-<index>`, cut to the 15-byte limit of `PR_SET_NAME`.
///
/// The index suffix is kept; the pool name is shortened instead.
pub fn worker_thread_name(pool: &str, index: u32) -> String {
    let suffix = format!("-{}", index);
    let room = MAX_THREAD_NAME_LEN.saturating_sub(suffix.len());
    let mut end = pool.len().min(room);
    while !pool.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &pool[..end], suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_name_fits() {
        assert_eq!(worker_thread_name("io", 3), "io-3");
        let long = worker_thread_name("a-very-long-pool-name", 12);
        assert_eq!(long.len(), MAX_THREAD_NAME_LEN);
        assert!(long.ends_with("-12"));
    }

    #[test]
    fn test_thread_name_char_boundary() {
        let name = worker_thread_name("ééééééééé", 0);
        assert!(name.len() <= MAX_THREAD_NAME_LEN);
        assert!(name.ends_with("-0"));
    }

    #[test]
    fn test_ids_are_stable_on_one_thread() {
        assert_eq!(current_thread_id(), current_thread_id());
        assert!(current_tid() > 0);
        assert!(min_stack_size() > 0);
    }
}
