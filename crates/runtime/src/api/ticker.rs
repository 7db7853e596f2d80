//! Driver traits shared by tickers and managers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::errors::{Result, RuntimeError};

/// Completion signal of a [`Ticker`].
///
/// Clones observe the same signal. Once done, a ticker has released all of its
/// resources and its [`Ticker::err`] is final.
#[derive(Debug, Clone)]
pub struct Done {
    token: CancellationToken,
}

impl Done {
    /// Waits until the owning ticker has fully stopped.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }

    /// Returns `true` once the owning ticker has fully stopped.
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owner side of a [`Done`] signal, held by [`Ticker`] implementations.
#[derive(Debug, Default)]
pub struct DoneSignal {
    token: CancellationToken,
}

impl DoneSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a receiver for this signal.
    pub fn done(&self) -> Done {
        Done {
            token: self.token.clone(),
        }
    }

    /// Fires the signal. Closing twice is a no-op.
    pub fn close(&self) {
        self.token.cancel();
    }
}

/// A runner that ticks a tree until it is stopped.
pub trait Ticker: Send + Sync {
    /// Completes when the ticker is fully stopped.
    fn done(&self) -> Done;

    /// Returns the error that stopped the ticker, if any.
    fn err(&self) -> Option<RuntimeError>;

    /// Requests shutdown without waiting for it. Idempotent.
    fn stop(&self);
}

/// An aggregate [`Ticker`] that stops on the first failure of any ticker it
/// manages.
pub trait Manager: Ticker {
    /// Registers a new ticker under this manager.
    ///
    /// Fails with [`RuntimeError::ManagerStopped`] once the manager has begun
    /// to stop.
    fn add(&self, ticker: Arc<dyn Ticker>) -> Result<()>;
}

impl<T: Ticker + ?Sized> Ticker for Arc<T> {
    #[inline]
    fn done(&self) -> Done {
        (**self).done()
    }

    #[inline]
    fn err(&self) -> Option<RuntimeError> {
        (**self).err()
    }

    #[inline]
    fn stop(&self) {
        (**self).stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn done_is_observed_by_every_clone() {
        let signal = DoneSignal::new();
        let first = signal.done();
        let second = first.clone();
        assert!(!first.is_done());

        signal.close();
        signal.close();

        first.wait().await;
        assert!(second.is_done());
    }
}
