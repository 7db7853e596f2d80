//! Stateful tick wrappers.
//!
//! Each wrapper turns blocking, long-running, or concurrent work into a tick
//! that can be polled once per control cycle:
//! - [`Async`] runs one tick on a worker thread and reports `Running` until done
//! - [`sync()`] gates a sibling set so only the advancing sibling runs real logic
//! - [`Fork`] ticks all children in parallel and joins them over several calls
//! - [`Background`] keeps a FIFO backlog of independently progressing tasks
//! - [`Memorize`] freezes each child's terminal result for one execution
//! - [`Any`] succeeds if any child succeeded during one execution
//! - [`Context`] scopes cancellation for the ticks of one tree
//!
//! None of these wrappers can interrupt work already handed to a thread: giving
//! up on polling leaves the thread to run to completion and its result is
//! dropped.
//!
//! Wrapper state is guarded by non-reentrant locks. A wrapper must never be
//! ticked again from inside its own tick call path.

mod any;
mod async_tick;
mod background;
mod context;
mod fork;
mod memorize;
mod sync;

pub use any::Any;
pub use async_tick::Async;
pub use background::Background;
pub use context::Context;
pub use fork::Fork;
pub use memorize::Memorize;
pub use sync::sync;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the state if a panicking tick poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
