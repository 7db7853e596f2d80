//! Aggregate supervisor of many tickers.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::api::{Done, DoneSignal, Manager, Result, RuntimeError, Ticker};

/// A [`Manager`] that stops every registered ticker on the first error.
///
/// Registrations are handed to a supervisor task, which spawns one watcher
/// per ticker. A watcher records its ticker's error, in arrival order, and
/// triggers [`Ticker::stop`] on the whole manager. Stopping the manager stops
/// and awaits every registered ticker before [`Ticker::done`] completes.
///
/// Managers are tickers themselves and can be nested.
#[derive(Clone)]
pub struct TickerManager {
    shared: Arc<Shared>,
    mailbox: mpsc::UnboundedSender<Arc<dyn Ticker>>,
}

struct Shared {
    stop: CancellationToken,
    done: DoneSignal,
    errs: RwLock<Vec<RuntimeError>>,
}

impl Shared {
    fn err(&self) -> Option<RuntimeError> {
        let errs = self.errs.read().unwrap_or_else(PoisonError::into_inner);
        if errs.is_empty() {
            None
        } else {
            Some(RuntimeError::Combined(errs.clone()))
        }
    }

    fn record(&self, err: RuntimeError) {
        self.errs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }
}

impl TickerManager {
    /// Creates an empty manager.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new() -> Self {
        let (mailbox, registrations) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            stop: CancellationToken::new(),
            done: DoneSignal::new(),
            errs: RwLock::new(Vec::new()),
        });
        tokio::spawn(supervise(shared.clone(), registrations));
        Self { shared, mailbox }
    }
}

impl Default for TickerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for TickerManager {
    fn done(&self) -> Done {
        self.shared.done.done()
    }

    fn err(&self) -> Option<RuntimeError> {
        self.shared.err()
    }

    fn stop(&self) {
        self.shared.stop.cancel();
    }
}

impl Manager for TickerManager {
    fn add(&self, ticker: Arc<dyn Ticker>) -> Result<()> {
        if !self.shared.stop.is_cancelled() && self.mailbox.send(ticker).is_ok() {
            return Ok(());
        }
        Err(RuntimeError::ManagerStopped {
            cause: self.shared.err().map(Box::new),
        })
    }
}

async fn supervise(
    shared: Arc<Shared>,
    mut registrations: mpsc::UnboundedReceiver<Arc<dyn Ticker>>,
) {
    let mut watchers = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = shared.stop.cancelled() => break,
            registration = registrations.recv() => match registration {
                Some(ticker) => {
                    watchers.spawn(watch(shared.clone(), ticker));
                    tracing::debug!(tickers = watchers.len(), "ticker registered");
                }
                // Every handle is gone: nothing can add or stop any more, so
                // wind down once the registered tickers finish on their own.
                None => break,
            },
            Some(_) = watchers.join_next(), if !watchers.is_empty() => {}
        }
    }

    // Registrations that raced with the stop are still honored.
    registrations.close();
    while let Ok(ticker) = registrations.try_recv() {
        watchers.spawn(watch(shared.clone(), ticker));
    }

    tracing::debug!(tickers = watchers.len(), "manager stopping");
    while watchers.join_next().await.is_some() {}

    shared.done.close();
    tracing::debug!("manager stopped");
}

async fn watch(shared: Arc<Shared>, ticker: Arc<dyn Ticker>) {
    let done = ticker.done();
    tokio::select! {
        _ = done.wait() => ticker.stop(),
        _ = shared.stop.cancelled() => {
            ticker.stop();
            done.wait().await;
        }
    }

    if let Some(err) = ticker.err() {
        tracing::warn!(%err, "managed ticker failed, stopping manager");
        shared.record(err);
        shared.stop.cancel();
    }
}
