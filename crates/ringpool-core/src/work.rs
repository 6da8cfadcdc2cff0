//! Work items and their fixed-size ring record.
//!
//! A work item is a boxed closure plus a submission sequence number. The
//! ring only stores bytes, so the closure is moved to the heap and its
//! thin pointer is written into a fixed-size record:
//!
//! ```text
//! offset 0:               job pointer (usize, native endian)
//! offset size_of<usize>:  sequence number (u64, native endian)
//! ```
//!
//! Every push and pop on the ring must move exactly `RECORD_SIZE` bytes,
//! otherwise later records lose their alignment.

use core::fmt;
use core::mem::size_of;

/// Unit of work executed by a pool worker.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

const PTR_SIZE: usize = size_of::<usize>();

/// Size in bytes of one encoded work record.
pub const RECORD_SIZE: usize = PTR_SIZE + size_of::<u64>();

/// Raw encoded record as stored in the ring.
pub type Record = [u8; RECORD_SIZE];

/// A closure queued for execution, tagged with its submission order.
pub struct WorkItem {
    job: Job,
    seq: u64,
}

impl WorkItem {
    pub fn new(job: Job, seq: u64) -> Self {
        Self { job, seq }
    }

    /// Build a work item from a plain callback and the argument it consumes.
    pub fn from_callback<A>(cb: fn(A), arg: A, seq: u64) -> Self
    where
        A: Send + 'static,
    {
        Self::new(Box::new(move || cb(arg)), seq)
    }

    /// Submission sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Execute the job, consuming the item.
    #[inline]
    pub fn run(self) {
        (self.job)()
    }

    /// Encode into a ring record.
    ///
    /// Ownership of the job moves into the record: exactly one matching
    /// `from_record` must follow, or the closure leaks.
    pub fn into_record(self) -> Record {
        let raw = Box::into_raw(Box::new(self.job)) as usize;
        let mut record = [0u8; RECORD_SIZE];
        record[..PTR_SIZE].copy_from_slice(&raw.to_ne_bytes());
        record[PTR_SIZE..].copy_from_slice(&self.seq.to_ne_bytes());
        record
    }

    /// Decode a record produced by `into_record`.
    ///
    /// # Safety
    ///
    /// `record` must be the unmodified output of exactly one prior
    /// `into_record` call, and must not have been decoded before.
    pub unsafe fn from_record(record: &Record) -> Self {
        let mut ptr_bytes = [0u8; PTR_SIZE];
        ptr_bytes.copy_from_slice(&record[..PTR_SIZE]);
        let mut seq_bytes = [0u8; 8];
        seq_bytes.copy_from_slice(&record[PTR_SIZE..]);

        let raw = usize::from_ne_bytes(ptr_bytes) as *mut Job;
        // Safety: pointer came from Box::into_raw in into_record and
        // ownership is reclaimed exactly once (caller contract).
        let job = *Box::from_raw(raw);
        Self {
            job,
            seq: u64::from_ne_bytes(seq_bytes),
        }
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").field("seq", &self.seq).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, size_of::<usize>() + 8);
    }

    #[test]
    fn test_record_executes_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let item = WorkItem::new(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }), 42);

        let record = item.into_record();
        let decoded = unsafe { WorkItem::from_record(&record) };
        assert_eq!(decoded.seq(), 42);
        decoded.run();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_decoded_item_releases_captures() {
        let token = Arc::new(());
        let t = Arc::clone(&token);
        let item = WorkItem::new(Box::new(move || drop(t)), 0);
        assert_eq!(Arc::strong_count(&token), 2);

        let record = item.into_record();
        let decoded = unsafe { WorkItem::from_record(&record) };
        drop(decoded);
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_from_callback() {
        fn bump(counter: Arc<AtomicUsize>) {
            counter.fetch_add(5, Ordering::SeqCst);
        }
        let counter = Arc::new(AtomicUsize::new(0));
        WorkItem::from_callback(bump, Arc::clone(&counter), 1).run();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_records_through_ring_keep_order() {
        let mut ring = RingBuffer::allocate((RECORD_SIZE * 4) as u32).unwrap();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..4u64 {
            let o = Arc::clone(&order);
            let rec = WorkItem::new(Box::new(move || o.lock().unwrap().push(i)), i).into_record();
            assert_eq!(ring.push(&rec) as usize, RECORD_SIZE);
        }
        assert!(ring.is_full());

        let mut rec = [0u8; RECORD_SIZE];
        while ring.pop(&mut rec) as usize == RECORD_SIZE {
            unsafe { WorkItem::from_record(&rec) }.run();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
