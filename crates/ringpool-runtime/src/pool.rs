//! Pool manager
//!
//! Owns a fixed set of detached worker threads, a `RingBuffer` of work
//! records, one mutex and two condition variables.
//!
//! # Locking
//!
//! A single `Mutex<Inner>` guards both ring cursors, the run flag, the
//! live/busy worker counts and the byte counters. The ring has no locking
//! of its own.
//!
//! - `work_cv`: `submit` signals one waiter per record; shutdown
//!   broadcasts to all. Workers re-check their predicate after every wake.
//! - `exit_cv`: each exiting worker broadcasts after decrementing the
//!   live count. Drain waits on it with a bounded timeout, so a lost
//!   notification costs at most one poll interval.
//!
//! Callbacks always run with the lock released.
//!
//! # Lifecycle
//!
//! ```text
//! create:   Starting -> Running                (or rollback -> Stopped)
//! shutdown: Running -> Stopping -> Stopped
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ringpool_core::work::Record;
use ringpool_core::{
    kdebug, kerror, kfatal, kinfo, ktrace, kwarn, Job, PoolError, PoolResult, PoolState,
    PoolStats, RingBuffer, StatsSink, WorkItem, RECORD_SIZE,
};

use crate::config::PoolConfig;
use crate::platform;
use crate::spawn::{OsSpawner, WorkerSpawner};
use crate::worker;

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// State guarded by the pool mutex.
struct Inner {
    state: PoolState,
    ring: RingBuffer,
    /// Cleared once to ask every worker to exit.
    run: bool,
    /// Workers spawned and not yet exited.
    live: u32,
    /// Workers currently inside a callback.
    busy: u32,
    bytes_published: u64,
    bytes_consumed: u64,
    panicked: u64,
    next_seq: u64,
}

/// Shared between the handle and every worker of one pool.
pub(crate) struct Shared {
    id: u64,
    name: String,
    max_threads: u32,
    max_queue: u32,
    drain_poll: Duration,
    inner: Mutex<Inner>,
    work_cv: Condvar,
    exit_cv: Condvar,
}

impl Shared {
    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    // Callbacks never run under the lock, so poisoning can only come from
    // a bug in this module; the counters are still consistent enough to
    // keep draining.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until a record is available or shutdown is requested.
    ///
    /// Returns `None` on shutdown; queued records are left for the
    /// drain to discard.
    pub(crate) fn next_item(&self) -> Option<WorkItem> {
        let mut inner = self.lock();
        while inner.run && (inner.ring.data_length() as usize) < RECORD_SIZE {
            inner = self.work_cv.wait(inner).unwrap_or_else(PoisonError::into_inner);
        }
        if !inner.run {
            return None;
        }

        let mut record: Record = [0u8; RECORD_SIZE];
        let len = inner.ring.pop(&mut record);
        if len as usize != RECORD_SIZE {
            kfatal!("pool {}: short read of {} bytes from work ring", self.name, len);
        }
        inner.busy += 1;
        inner.bytes_consumed += u64::from(len);
        drop(inner);

        // Safety: every full record in the ring was written by submit()
        // from into_record() and is popped exactly once, here.
        Some(unsafe { WorkItem::from_record(&record) })
    }

    /// Account for a finished callback.
    pub(crate) fn finish_item(&self, panicked: bool) {
        let mut inner = self.lock();
        inner.busy = match inner.busy.checked_sub(1) {
            Some(n) => n,
            None => kfatal!("pool {}: busy worker count underflow", self.name),
        };
        if panicked {
            inner.panicked += 1;
        }
    }

    /// Called once by each worker on its way out.
    pub(crate) fn worker_exited(&self) {
        let mut inner = self.lock();
        inner.live = match inner.live.checked_sub(1) {
            Some(n) => n,
            None => kfatal!("pool {}: live worker count underflow", self.name),
        };
        drop(inner);
        self.exit_cv.notify_all();
    }

    /// Clear the run flag, wake every worker, and wait until at most
    /// `keep` of them remain. Returns the guard with the pool drained.
    fn stop_and_drain(&self, keep: u32) -> MutexGuard<'_, Inner> {
        let mut inner = self.lock();
        inner.run = false;
        inner.state = PoolState::Stopping;
        self.work_cv.notify_all();

        while inner.live > keep {
            let (guard, _) = self
                .exit_cv
                .wait_timeout(inner, self.drain_poll)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
            if inner.live > keep {
                self.work_cv.notify_all();
            }
        }
        inner
    }
}

/// Handle to one pool instance.
///
/// The handle is the single owner of the pool's lifetime: `destroy`
/// consumes it and dropping it shuts the pool down. Share it between
/// submitters with `Arc<ThreadPool>` or scoped threads.
pub struct ThreadPool {
    shared: Arc<Shared>,
}

impl ThreadPool {
    /// Create a pool and start all of its workers.
    pub fn create(config: PoolConfig) -> PoolResult<Self> {
        Self::create_with_spawner(config, &OsSpawner)
    }

    /// Like `create`, but threads come from `spawner`.
    ///
    /// If any worker fails to spawn, workers already started are stopped
    /// and waited for, the ring is freed, and `ThreadSpawnFailure` is
    /// returned. No partial pool survives.
    pub fn create_with_spawner(config: PoolConfig, spawner: &dyn WorkerSpawner) -> PoolResult<Self> {
        if let Err(e) = config.validate() {
            kerror!("pool {:?}: {}", config.pool_name, e);
            return Err(e.into());
        }
        let ring_bytes = config
            .ring_bytes()
            .ok_or(PoolError::InvalidArgument("msg_node_max too large for a 32-bit ring"))?;
        let ring = RingBuffer::allocate(ring_bytes).map_err(|e| {
            kerror!("pool {}: ring allocation failed: {}", config.pool_name, e);
            e
        })?;

        let shared = Arc::new(Shared {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            name: config.pool_name.clone(),
            max_threads: config.max_thread_nums,
            max_queue: config.msg_node_max,
            drain_poll: config.drain_poll_interval,
            inner: Mutex::new(Inner {
                state: PoolState::Starting,
                ring,
                run: true,
                live: 0,
                busy: 0,
                bytes_published: 0,
                bytes_consumed: 0,
                panicked: 0,
                next_seq: 0,
            }),
            work_cv: Condvar::new(),
            exit_cv: Condvar::new(),
        });

        kdebug!(
            "pool {}: starting {} workers, queue {} x {} bytes",
            shared.name, config.max_thread_nums, config.msg_node_max, RECORD_SIZE
        );

        for index in 0..config.max_thread_nums {
            // Count the worker before it exists so an early exit can never
            // drive the live count below zero.
            shared.lock().live += 1;

            let name = platform::worker_thread_name(&shared.name, index);
            let body_shared = Arc::clone(&shared);
            let body: Job = Box::new(move || worker::worker_loop(body_shared, index));

            if let Err(e) = spawner.spawn(index, name, config.thread_stack_size as usize, body) {
                shared.lock().live -= 1;
                kerror!(
                    "pool {}: worker {} failed to spawn: {}, rolling back",
                    shared.name, index, e
                );
                Self::rollback(&shared);
                return Err(PoolError::ThreadSpawnFailure {
                    worker: index,
                    os_error: e.raw_os_error(),
                });
            }
        }

        shared.lock().state = PoolState::Running;
        kinfo!(
            "pool {}: running, {} workers, queue depth {}",
            shared.name, config.max_thread_nums, config.msg_node_max
        );
        Ok(Self { shared })
    }

    fn rollback(shared: &Shared) {
        let mut inner = shared.stop_and_drain(0);
        inner.ring.free();
        inner.state = PoolState::Stopped;
    }

    /// Queue a closure for execution on a worker.
    ///
    /// Never blocks. Fails with `QueueFull` when `msg_node_max` records
    /// are already waiting, and with `NotStarted` unless the pool is
    /// running.
    pub fn add_work<F>(&self, f: F) -> PoolResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(move |seq| WorkItem::new(Box::new(f), seq))
    }

    /// Queue `cb(arg)`. The argument moves into the pool and is handed to
    /// exactly one worker.
    pub fn add_callback<A>(&self, cb: fn(A), arg: A) -> PoolResult<()>
    where
        A: Send + 'static,
    {
        self.submit(move |seq| WorkItem::from_callback(cb, arg, seq))
    }

    /// `make` runs under the lock only once the record is known to fit;
    /// on rejection it is dropped unlocked, together with its captures.
    fn submit<M>(&self, make: M) -> PoolResult<()>
    where
        M: FnOnce(u64) -> WorkItem,
    {
        let shared = &*self.shared;
        let mut inner = shared.lock();

        if !inner.state.accepts_work() {
            drop(inner);
            kwarn!("pool {}: add_work rejected, pool not started", shared.name);
            return Err(PoolError::NotStarted);
        }
        let queued = inner.ring.data_length() / RECORD_SIZE as u32;
        if queued >= shared.max_queue || (inner.ring.available_space() as usize) < RECORD_SIZE {
            drop(inner);
            kwarn!("pool {}: add_work rejected, queue full", shared.name);
            return Err(PoolError::QueueFull);
        }

        let seq = inner.next_seq;
        let record = make(seq).into_record();
        let written = inner.ring.push(&record);
        if written as usize != RECORD_SIZE {
            kfatal!("pool {}: short write of {} bytes to work ring", shared.name, written);
        }
        inner.next_seq += 1;
        inner.bytes_published += u64::from(written);
        drop(inner);

        ktrace!("pool {}: queued work #{}", shared.name, seq);
        shared.work_cv.notify_one();
        Ok(())
    }

    /// Stop the pool and wait for its workers to exit.
    ///
    /// Workers finish the callback they are running; records still queued
    /// are dropped without running. Fails with `NotStarted` if the pool is
    /// not running (already shut down).
    ///
    /// Called from one of this pool's own callbacks, it waits for every
    /// other worker; the calling worker exits when its callback returns.
    pub fn shutdown(&self) -> PoolResult<()> {
        let shared = &*self.shared;
        {
            let mut inner = shared.lock();
            if inner.state != PoolState::Running {
                drop(inner);
                kwarn!("pool {}: shutdown requested, pool not running", shared.name);
                return Err(PoolError::NotStarted);
            }
            inner.state = PoolState::Stopping;
        }
        kinfo!("pool {}: stopping", shared.name);

        let keep = if worker::is_worker_of(shared.id) { 1 } else { 0 };
        let mut inner = shared.stop_and_drain(keep);

        let mut discarded = Vec::new();
        let mut record: Record = [0u8; RECORD_SIZE];
        while inner.ring.pop(&mut record) as usize == RECORD_SIZE {
            // Safety: same invariant as Shared::next_item; workers are gone
            // (or parked outside the ring) so nobody else pops.
            discarded.push(unsafe { WorkItem::from_record(&record) });
        }
        inner.ring.free();
        inner.state = PoolState::Stopped;
        drop(inner);

        if !discarded.is_empty() {
            kinfo!("pool {}: discarded {} queued items", shared.name, discarded.len());
        }
        // Captured values may hold pool handles; drop them unlocked.
        drop(discarded);

        kinfo!("pool {}: stopped", shared.name);
        Ok(())
    }

    /// Shut down and release the handle.
    pub fn destroy(self) -> PoolResult<()> {
        self.shutdown()
    }

    /// Lock-protected snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let shared = &*self.shared;
        let inner = shared.lock();
        PoolStats {
            name: shared.name.clone(),
            state: inner.state,
            max_threads: shared.max_threads,
            live_threads: inner.live,
            busy_threads: inner.busy,
            max_queue: shared.max_queue,
            used_queue: inner.ring.data_length() / RECORD_SIZE as u32,
            bytes_published: inner.bytes_published,
            bytes_consumed: inner.bytes_consumed,
            panicked: inner.panicked,
        }
    }

    /// Render current stats through `sink`.
    pub fn show(&self, sink: &mut dyn StatsSink) {
        sink.render(&self.stats());
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> PoolState {
        self.shared.lock().state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state().accepts_work()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if !self.state().is_terminating() {
            let _ = self.shutdown();
        }
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.shared.name)
            .field("id", &self.shared.id)
            .finish_non_exhaustive()
    }
}
