mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use behavior_runtime::{Fork, RuntimeError, StopOnFailure, Ticker, TickerConfig, TreeTicker};
use behavior_tree::{Error, Node, Status, tick_fn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use common::{counting_leaf, init_tracing, wait_done};

const PERIOD: Duration = Duration::from_millis(5);

#[tokio::test]
async fn ticks_until_the_first_error() {
    init_tracing();
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let token = CancellationToken::new();
    let ticker = TreeTicker::new(
        &token,
        PERIOD,
        Node::leaf(tick_fn(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 4 {
                Ok(Status::Running)
            } else {
                Err(Error::msg("some_error"))
            }
        })),
    );

    wait_done(ticker.done()).await;

    let err = ticker.err().expect("tick error should be recorded");
    assert_eq!(err.to_string(), "some_error");
    assert_eq!(ticks.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn failures_do_not_stop_a_plain_ticker() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let token = CancellationToken::new();
    let ticker = TreeTicker::new(&token, PERIOD, counting_leaf(Status::Failure, &ticks));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!ticker.done().is_done());
    assert!(ticks.load(Ordering::SeqCst) > 1);

    ticker.stop();
    wait_done(ticker.done()).await;
    assert!(ticker.err().is_none());
}

#[tokio::test]
async fn parent_cancellation_is_reported() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let parent = CancellationToken::new();
    let ticker = TreeTicker::new(&parent, PERIOD, counting_leaf(Status::Success, &ticks));

    tokio::time::sleep(Duration::from_millis(20)).await;
    parent.cancel();
    wait_done(ticker.done()).await;

    assert!(matches!(ticker.err(), Some(RuntimeError::Cancelled)));
}

#[tokio::test]
async fn stopping_does_not_cancel_the_parent() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let parent = CancellationToken::new();
    let ticker = TreeTicker::new(&parent, PERIOD, counting_leaf(Status::Success, &ticks));

    ticker.stop();
    wait_done(ticker.done()).await;

    assert!(!parent.is_cancelled());
    assert!(ticker.err().is_none());
}

#[tokio::test]
async fn panicking_ticks_are_recovered_into_errors() {
    let token = CancellationToken::new();
    let ticker = TreeTicker::new(
        &token,
        PERIOD,
        Node::leaf(tick_fn(|_| panic!("tree exploded"))),
    );

    wait_done(ticker.done()).await;

    match ticker.err() {
        Some(RuntimeError::Panicked(message)) => assert_eq!(message, "tree exploded"),
        other => panic!("expected a recovered panic, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_root_tick_stops_the_ticker() {
    let token = CancellationToken::new();
    let ticker = TreeTicker::new(&token, PERIOD, Node::from_tick_ref(None, Vec::new()));

    wait_done(ticker.done()).await;

    assert!(matches!(
        ticker.err(),
        Some(RuntimeError::Tick(Error::MissingTick))
    ));
}

#[tokio::test]
async fn stop_on_failure_exits_cleanly() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let token = CancellationToken::new();
    let ticker = StopOnFailure::new(
        &token,
        PERIOD,
        Node::leaf(tick_fn(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(Status::Success)
            } else {
                Ok(Status::Failure)
            }
        })),
    );

    wait_done(ticker.done()).await;

    assert!(ticker.err().is_none());
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn stop_on_failure_surfaces_real_errors() {
    let token = CancellationToken::new();
    let ticker = StopOnFailure::new(
        &token,
        PERIOD,
        Node::leaf(tick_fn(|_| Err(Error::msg("real_error")))),
    );

    wait_done(ticker.done()).await;

    assert_eq!(ticker.err().unwrap().to_string(), "real_error");
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_wrappers_can_be_driven() {
    let token = CancellationToken::new();
    let children: Vec<Node> = (0..3)
        .map(|_| {
            Node::leaf(tick_fn(|_| {
                std::thread::sleep(Duration::from_millis(10));
                Ok(Status::Failure)
            }))
        })
        .collect();
    let ticker = StopOnFailure::with_config(
        &token,
        TickerConfig {
            period: PERIOD,
            missed_tick_behavior: MissedTickBehavior::Delay,
        },
        Node::new(Fork::new(), children),
    );

    wait_done(ticker.done()).await;
    assert!(ticker.err().is_none());
}
