//! Process-wide pool
//!
//! For callers that only ever need one pool. The instance is an ordinary
//! `ThreadPool` held in a module-level slot; every function here forwards
//! to it.
//!
//! ```rust,ignore
//! use ringpool_runtime::{global, PoolConfig};
//!
//! global::start(PoolConfig::from_env())?;
//! global::add_work(|| println!("hello from the pool"))?;
//! global::stop()?;
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use ringpool_core::{kinfo, PoolError, PoolResult, PoolStats, StatsSink};

use crate::config::PoolConfig;
use crate::pool::ThreadPool;

static GLOBAL: Mutex<Option<ThreadPool>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<ThreadPool>> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create the process-wide pool. Fails with `AlreadyStarted` if one exists.
pub fn start(config: PoolConfig) -> PoolResult<()> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(PoolError::AlreadyStarted);
    }
    *slot = Some(ThreadPool::create(config)?);
    kinfo!("global pool started");
    Ok(())
}

/// Shut down and release the process-wide pool.
pub fn stop() -> PoolResult<()> {
    // Take the pool out first so callbacks reaching for the global slot
    // during drain see NotStarted rather than blocking on it.
    let pool = slot().take().ok_or(PoolError::NotStarted)?;
    pool.destroy()
}

pub fn add_work<F>(f: F) -> PoolResult<()>
where
    F: FnOnce() + Send + 'static,
{
    slot().as_ref().ok_or(PoolError::NotStarted)?.add_work(f)
}

pub fn add_callback<A>(cb: fn(A), arg: A) -> PoolResult<()>
where
    A: Send + 'static,
{
    slot().as_ref().ok_or(PoolError::NotStarted)?.add_callback(cb, arg)
}

pub fn stats() -> PoolResult<PoolStats> {
    Ok(slot().as_ref().ok_or(PoolError::NotStarted)?.stats())
}

pub fn show(sink: &mut dyn StatsSink) -> PoolResult<()> {
    let stats = stats()?;
    sink.render(&stats);
    Ok(())
}

#[inline]
pub fn is_started() -> bool {
    slot().is_some()
}
