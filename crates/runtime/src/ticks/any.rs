use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use behavior_tree::{Node, Status, Tick, TickRef, TickResult};

/// Succeeds if any child succeeded during the execution of the wrapped tick.
///
/// Every child is wrapped so that a `Success` flags the execution. While the
/// wrapped tick reports `Running` the flag accumulates, across calls and
/// across the threads a [`Fork`](crate::Fork) ticks children on. Once it
/// reports a terminal status, that status is replaced: `Success` if the flag
/// is set, otherwise `Failure`. Errors propagate unchanged. Both end the
/// execution and clear the flag.
///
/// Pairs with stateless composites to express "at least one", for example
/// `Any` over [`All`](behavior_tree::All) ticks every child and succeeds if
/// one of them did.
pub struct Any {
    tick: TickRef,
    success: Arc<AtomicBool>,
}

impl Any {
    pub fn new(tick: TickRef) -> Self {
        Self {
            tick,
            success: Arc::default(),
        }
    }

    /// Shorthand for `Arc::new(Any::new(tick))`.
    pub fn wrap(tick: TickRef) -> TickRef {
        Arc::new(Self::new(tick))
    }

    fn flagged(&self, child: &Node) -> Node {
        let child = child.clone();
        let success = self.success.clone();
        Node::from_fn(move || {
            let (tick, children) = child.expand();
            let tick = tick.map(|tick| {
                Arc::new(Flag {
                    tick,
                    success: success.clone(),
                }) as TickRef
            });
            (tick, children)
        })
    }
}

impl Tick for Any {
    fn tick(&self, children: &[Node]) -> TickResult {
        let children: Vec<Node> = children.iter().map(|child| self.flagged(child)).collect();

        match self.tick.tick(&children) {
            Ok(Status::Running) => Ok(Status::Running),
            Ok(_) if self.success.swap(false, Ordering::SeqCst) => Ok(Status::Success),
            Ok(_) => Ok(Status::Failure),
            Err(err) => {
                self.success.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }
}

struct Flag {
    tick: TickRef,
    success: Arc<AtomicBool>,
}

impl Tick for Flag {
    fn tick(&self, children: &[Node]) -> TickResult {
        let result = self.tick.tick(children);
        if matches!(result, Ok(Status::Success)) {
            self.success.store(true, Ordering::SeqCst);
        }
        result
    }
}
