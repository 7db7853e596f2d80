use std::sync::Mutex;
use std::thread;

use tokio::sync::mpsc;

use behavior_tree::{Error, Node, Status, Tick, TickResult};

use super::lock;

/// Ticks every child at once and joins them over as many calls as needed.
///
/// Each call ticks, in parallel, every child that has not yet finished in the
/// current cycle and **blocks** until all of them report. Children returning
/// `Running` are ticked again on the next call; the others are done for this
/// cycle. Once no child is running the cycle ends with `Success` if every
/// child succeeded, otherwise `Failure`, or the errors of all children joined
/// with `" | "` in the order they arrived. The next call starts a new cycle.
///
/// Because it blocks on worker threads, a fork must be ticked off the async
/// executor, for example from a [`TreeTicker`](crate::TreeTicker).
#[derive(Default)]
pub struct Fork {
    round: Mutex<Round>,
}

/// State of one fork cycle. Only the ticking thread ever touches it.
#[derive(Default)]
struct Round {
    remaining: Vec<Node>,
    status: Option<Status>,
    err: Option<Error>,
}

/// Result of one child, applied to the round by the ticking thread.
type Apply = Box<dyn FnOnce(&mut Round) + Send>;

impl Round {
    fn record(&mut self, node: Node, result: TickResult) {
        match result {
            Err(err) => self.fail(err),
            Ok(Status::Running) => self.remaining.push(node),
            Ok(Status::Success) => {}
            Ok(Status::Failure) => self.status = Some(Status::Failure),
        }
    }

    fn fail(&mut self, err: Error) {
        self.err = Some(Error::join(self.err.take(), err));
        self.status = Some(Status::Failure);
    }
}

impl Fork {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tick for Fork {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut round = lock(&self.round);

        if round.status.is_none() && round.err.is_none() {
            round.status = Some(Status::Success);
            round.remaining = children.to_vec();
        }

        let pending = std::mem::take(&mut round.remaining);
        if !pending.is_empty() {
            let (tx, mut rx) = mpsc::channel::<Apply>(pending.len());
            let mut spawned = 0;
            for node in pending {
                let tx = tx.clone();
                let worker = thread::Builder::new()
                    .name("bt-fork".into())
                    .spawn(move || {
                        let result = node.tick();
                        let apply: Apply =
                            Box::new(move |round: &mut Round| round.record(node, result));
                        let _ = tx.blocking_send(apply);
                    });
                match worker {
                    Ok(_) => spawned += 1,
                    Err(err) => round.fail(Error::custom(err)),
                }
            }
            drop(tx);

            let mut reported = 0;
            while let Some(apply) = rx.blocking_recv() {
                apply(&mut *round);
                reported += 1;
            }
            if reported < spawned {
                round.fail(Error::msg("fork child exited without reporting"));
            }
        }

        if !round.remaining.is_empty() {
            return Ok(Status::Running);
        }

        let status = round.status.take().unwrap_or(Status::Success);
        tracing::trace!(%status, "fork cycle complete");
        match round.err.take() {
            Some(err) => Err(err),
            None => Ok(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use behavior_tree::tick_fn;

    use super::*;

    fn fixed(status: Status) -> Node {
        Node::leaf(tick_fn(move |_| Ok(status)))
    }

    fn failing_after(message: &'static str, delay: Duration) -> Node {
        Node::leaf(tick_fn(move |_| {
            thread::sleep(delay);
            Err(Error::msg(message))
        }))
    }

    /// A child that reports `Running` for `running` ticks, then `status`.
    fn countdown(running: usize, status: Status, ticks: Arc<AtomicUsize>) -> Node {
        Node::leaf(tick_fn(move |_| {
            let n = ticks.fetch_add(1, Ordering::SeqCst);
            if n < running {
                Ok(Status::Running)
            } else {
                Ok(status)
            }
        }))
    }

    #[test]
    fn all_success_completes_on_first_call() {
        let fork = Fork::new();
        let children = vec![fixed(Status::Success); 4];

        assert_eq!(fork.tick(&children).unwrap(), Status::Success);
    }

    #[test]
    fn zero_children_always_succeed() {
        let fork = Fork::new();
        for _ in 0..3 {
            assert_eq!(fork.tick(&[]).unwrap(), Status::Success);
        }
    }

    #[test]
    fn errors_join_in_arrival_order() {
        let fork = Fork::new();
        let children = vec![
            failing_after("e1", Duration::ZERO),
            failing_after("e2", Duration::from_millis(50)),
        ];

        let err = fork.tick(&children).unwrap_err();
        assert_eq!(err.to_string(), "e1 | e2");
    }

    #[test]
    fn running_children_are_re_ticked_until_done() {
        let slow_ticks = Arc::new(AtomicUsize::new(0));
        let fast_ticks = Arc::new(AtomicUsize::new(0));
        let fork = Fork::new();
        let children = vec![
            countdown(2, Status::Success, slow_ticks.clone()),
            countdown(0, Status::Success, fast_ticks.clone()),
        ];

        assert_eq!(fork.tick(&children).unwrap(), Status::Running);
        assert_eq!(fork.tick(&children).unwrap(), Status::Running);
        assert_eq!(fork.tick(&children).unwrap(), Status::Success);

        assert_eq!(slow_ticks.load(Ordering::SeqCst), 3);
        assert_eq!(fast_ticks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_is_sticky_for_the_cycle_then_resets() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let fork = Fork::new();
        let children = vec![
            fixed(Status::Failure),
            countdown(1, Status::Success, ticks.clone()),
        ];

        assert_eq!(fork.tick(&children).unwrap(), Status::Running);
        assert_eq!(fork.tick(&children).unwrap(), Status::Failure);

        // New cycle: both children are ticked again.
        let children = vec![fixed(Status::Success), fixed(Status::Success)];
        assert_eq!(fork.tick(&children).unwrap(), Status::Success);
    }

    #[test]
    fn child_dying_without_a_report_fails_the_cycle() {
        let fork = Fork::new();
        let children = vec![
            Node::leaf(tick_fn(|_| panic!("child exploded"))),
            fixed(Status::Success),
        ];

        let err = fork.tick(&children).unwrap_err();
        assert_eq!(err.to_string(), "fork child exited without reporting");

        // The failed cycle leaves nothing behind.
        let children = vec![fixed(Status::Success), fixed(Status::Success)];
        assert_eq!(fork.tick(&children).unwrap(), Status::Success);
    }

    #[test]
    fn children_run_in_parallel() {
        let fork = Fork::new();
        let children: Vec<Node> = (0..4)
            .map(|_| {
                Node::leaf(tick_fn(|_| {
                    thread::sleep(Duration::from_millis(100));
                    Ok(Status::Success)
                }))
            })
            .collect();

        let started = std::time::Instant::now();
        assert_eq!(fork.tick(&children).unwrap(), Status::Success);
        assert!(started.elapsed() < Duration::from_millis(350));
    }
}
