//! Periodic single-tree driver.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;

use behavior_tree::{Node, Status, Tick, TickRef, TickResult};

use crate::api::{Done, DoneSignal, RuntimeError, Ticker};
use crate::config::TickerConfig;
use crate::ticks::lock;

/// Ticks a root node once per period on a tokio task.
///
/// The driver runs until the parent token is cancelled
/// ([`RuntimeError::Cancelled`]), [`Ticker::stop`] is called (no error), or a
/// tick returns an error. Ticks run on the blocking pool, so blocking wrappers
/// such as [`Fork`](crate::Fork) are safe at any depth of the tree. A tick
/// that panics is recovered into [`RuntimeError::Panicked`] and stops the
/// ticker like any other error.
#[derive(Clone)]
pub struct TreeTicker {
    inner: Arc<TickerInner>,
}

struct TickerInner {
    ctx: CancellationToken,
    stop: CancellationToken,
    done: DoneSignal,
    err: Mutex<Option<RuntimeError>>,
}

impl TreeTicker {
    /// Starts ticking `node` every `period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero, or if called outside a tokio runtime.
    pub fn new(parent: &CancellationToken, period: Duration, node: Node) -> Self {
        Self::with_config(parent, TickerConfig::with_period(period), node)
    }

    /// Starts ticking `node` as described by `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config.period` is zero, or if called outside a tokio
    /// runtime.
    pub fn with_config(parent: &CancellationToken, config: TickerConfig, node: Node) -> Self {
        assert!(
            !config.period.is_zero(),
            "TreeTicker period must be greater than zero"
        );

        let inner = Arc::new(TickerInner {
            ctx: parent.child_token(),
            stop: CancellationToken::new(),
            done: DoneSignal::new(),
            err: Mutex::new(None),
        });
        tokio::spawn(run(inner.clone(), config, node));
        Self { inner }
    }
}

impl Ticker for TreeTicker {
    fn done(&self) -> Done {
        self.inner.done.done()
    }

    fn err(&self) -> Option<RuntimeError> {
        lock(&self.inner.err).clone()
    }

    fn stop(&self) {
        self.inner.stop.cancel();
    }
}

async fn run(inner: Arc<TickerInner>, config: TickerConfig, node: Node) {
    tracing::debug!(period = ?config.period, "ticker started");

    let mut interval = interval_at(Instant::now() + config.period, config.period);
    interval.set_missed_tick_behavior(config.missed_tick_behavior);

    let err = loop {
        tokio::select! {
            biased;
            _ = inner.ctx.cancelled() => break Some(RuntimeError::Cancelled),
            _ = inner.stop.cancelled() => break None,
            _ = interval.tick() => {
                let node = node.clone();
                match tokio::task::spawn_blocking(move || node.tick()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => break Some(RuntimeError::Tick(err)),
                    Err(join) if join.is_panic() => {
                        break Some(RuntimeError::from_panic(join.into_panic()));
                    }
                    Err(_) => break Some(RuntimeError::Cancelled),
                }
            }
        }
    };

    match &err {
        Some(err) => tracing::debug!(%err, "ticker stopped with error"),
        None => tracing::debug!("ticker stopped"),
    }

    *lock(&inner.err) = err;
    inner.stop.cancel();
    inner.ctx.cancel();
    inner.done.close();
}

/// Internal stop signal of [`StopOnFailure`], never surfaced by
/// [`Ticker::err`].
#[derive(Debug, Error)]
#[error("ticker exit on failure")]
struct ExitOnFailure;

/// A [`TreeTicker`] that also stops on the first `Failure` of the root node.
///
/// A plain failure leaves [`Ticker::err`] empty; genuine errors still surface.
#[derive(Clone)]
pub struct StopOnFailure {
    ticker: TreeTicker,
}

impl StopOnFailure {
    /// Starts ticking `node` every `period`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`TreeTicker::new`].
    pub fn new(parent: &CancellationToken, period: Duration, node: Node) -> Self {
        Self::with_config(parent, TickerConfig::with_period(period), node)
    }

    pub fn with_config(parent: &CancellationToken, config: TickerConfig, node: Node) -> Self {
        let node = Node::from_fn(move || {
            let (tick, children) = node.expand();
            let tick = tick.map(|tick| Arc::new(ExitOnFailureTick(tick)) as TickRef);
            (tick, children)
        });
        Self {
            ticker: TreeTicker::with_config(parent, config, node),
        }
    }
}

impl Ticker for StopOnFailure {
    fn done(&self) -> Done {
        self.ticker.done()
    }

    fn err(&self) -> Option<RuntimeError> {
        match self.ticker.err() {
            Some(RuntimeError::Tick(err)) if err.downcast_ref::<ExitOnFailure>().is_some() => None,
            other => other,
        }
    }

    fn stop(&self) {
        self.ticker.stop();
    }
}

struct ExitOnFailureTick(TickRef);

impl Tick for ExitOnFailureTick {
    fn tick(&self, children: &[Node]) -> TickResult {
        match self.0.tick(children) {
            Ok(Status::Failure) => Err(behavior_tree::Error::custom(ExitOnFailure)),
            other => other,
        }
    }
}
