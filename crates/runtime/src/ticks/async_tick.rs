use std::sync::{Arc, Mutex};
use std::thread;

use tokio::sync::oneshot::{self, error::TryRecvError};

use behavior_tree::{Error, Node, Status, Tick, TickRef, TickResult};

use super::lock;

/// Runs the wrapped tick on a worker thread, reporting `Running` until the
/// result is available.
///
/// The first call spawns exactly one thread against the children supplied on
/// that call. Later calls poll without blocking; children passed while the
/// thread is in flight are ignored. Once the result has been handed back, the
/// next call starts a fresh run.
pub struct Async {
    tick: TickRef,
    pending: Mutex<Option<oneshot::Receiver<TickResult>>>,
}

impl Async {
    pub fn new(tick: TickRef) -> Self {
        Self {
            tick,
            pending: Mutex::new(None),
        }
    }

    /// Shorthand for `Arc::new(Async::new(tick))`.
    pub fn wrap(tick: TickRef) -> TickRef {
        Arc::new(Self::new(tick))
    }

    /// Returns `true` while a worker thread is in flight.
    pub fn is_running(&self) -> bool {
        lock(&self.pending).is_some()
    }
}

impl Tick for Async {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut pending = lock(&self.pending);

        let Some(rx) = pending.as_mut() else {
            let (tx, rx) = oneshot::channel();
            let tick = self.tick.clone();
            let children = children.to_vec();
            thread::Builder::new()
                .name("bt-async".into())
                .spawn(move || {
                    let _ = tx.send(tick.tick(&children));
                })
                .map_err(Error::custom)?;
            tracing::trace!("async tick started");
            *pending = Some(rx);
            return Ok(Status::Running);
        };

        match rx.try_recv() {
            Ok(result) => {
                *pending = None;
                tracing::trace!(?result, "async tick finished");
                result
            }
            Err(TryRecvError::Empty) => Ok(Status::Running),
            Err(TryRecvError::Closed) => {
                *pending = None;
                Err(Error::msg("async tick exited without a result"))
            }
        }
    }
}
