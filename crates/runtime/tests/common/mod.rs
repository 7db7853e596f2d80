#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use behavior_runtime::{Done, DoneSignal, RuntimeError, Ticker};
use behavior_tree::{Error, Node, Status, tick_fn};

/// Routes `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Waits for `done`, failing the test if it takes longer than two seconds.
pub async fn wait_done(done: Done) {
    tokio::time::timeout(Duration::from_secs(2), done.wait())
        .await
        .expect("ticker should finish in time");
}

pub fn tick_error(message: &str) -> RuntimeError {
    RuntimeError::Tick(Error::msg(message))
}

/// A leaf counting its ticks and returning `status` every time.
pub fn counting_leaf(status: Status, ticks: &Arc<AtomicUsize>) -> Node {
    let ticks = ticks.clone();
    Node::leaf(tick_fn(move |_| {
        ticks.fetch_add(1, Ordering::SeqCst);
        Ok(status)
    }))
}

/// A hand-driven ticker for manager tests.
///
/// It finishes when [`MockTicker::fail`] is called, or shortly after
/// [`Ticker::stop`], reporting the error configured for that case.
#[derive(Clone)]
pub struct MockTicker {
    inner: Arc<MockInner>,
}

struct MockInner {
    done: DoneSignal,
    err: Mutex<Option<RuntimeError>>,
    on_stop: Option<RuntimeError>,
    stop_delay: Duration,
    stopped: AtomicBool,
}

impl MockTicker {
    pub fn new() -> Self {
        Self::build(None, Duration::ZERO)
    }

    /// A ticker that takes `delay` to stop and then reports `err`.
    pub fn erroring_on_stop(err: RuntimeError, delay: Duration) -> Self {
        Self::build(Some(err), delay)
    }

    fn build(on_stop: Option<RuntimeError>, stop_delay: Duration) -> Self {
        Self {
            inner: Arc::new(MockInner {
                done: DoneSignal::new(),
                err: Mutex::new(None),
                on_stop,
                stop_delay,
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Finishes the ticker with `err`.
    pub fn fail(&self, err: RuntimeError) {
        *self.inner.err.lock().unwrap() = Some(err);
        self.inner.done.close();
    }

    pub fn was_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }
}

impl Ticker for MockTicker {
    fn done(&self) -> Done {
        self.inner.done.done()
    }

    fn err(&self) -> Option<RuntimeError> {
        self.inner.err.lock().unwrap().clone()
    }

    fn stop(&self) {
        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.stop_delay).await;
            if !inner.done.done().is_done() {
                *inner.err.lock().unwrap() = inner.on_stop.clone();
                inner.done.close();
            }
        });
    }
}
