use std::sync::{Arc, Mutex};

use behavior_tree::{Node, Status, Tick, TickRef, TickResult};

use super::lock;

/// Caches the first terminal result of each child for one execution of the
/// wrapped tick.
///
/// An execution lasts until the wrapped tick itself returns anything other
/// than `Running`. Within it, a child that has finished keeps replaying its
/// result without running its logic again, while its children are still
/// expanded fresh. This lets stateless composites such as
/// [`Sequence`](behavior_tree::Sequence) drive asynchronous children in order.
///
/// Children are snapshotted on the first call of every execution; children
/// passed on later calls of the same execution are ignored.
pub struct Memorize {
    tick: TickRef,
    execution: Mutex<Option<Vec<Node>>>,
}

impl Memorize {
    pub fn new(tick: TickRef) -> Self {
        Self {
            tick,
            execution: Mutex::new(None),
        }
    }

    /// Shorthand for `Arc::new(Memorize::new(tick))`.
    pub fn wrap(tick: TickRef) -> TickRef {
        Arc::new(Self::new(tick))
    }
}

impl Tick for Memorize {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut execution = lock(&self.execution);
        let nodes = execution.get_or_insert_with(|| children.iter().map(memorized).collect());

        let result = self.tick.tick(nodes);
        if !matches!(result, Ok(Status::Running)) {
            *execution = None;
        }
        result
    }
}

/// Wraps `child` so its first terminal result is recorded and replayed.
fn memorized(child: &Node) -> Node {
    let child = child.clone();
    let recorded: Arc<Mutex<Option<TickResult>>> = Arc::default();

    Node::from_fn(move || {
        let (tick, children) = child.expand();
        if let Some(result) = lock(&recorded).clone() {
            let replay: TickRef = Arc::new(Replay(result));
            return (Some(replay), children);
        }
        let tick = tick.map(|tick| {
            Arc::new(Record {
                tick,
                recorded: recorded.clone(),
            }) as TickRef
        });
        (tick, children)
    })
}

struct Record {
    tick: TickRef,
    recorded: Arc<Mutex<Option<TickResult>>>,
}

impl Tick for Record {
    fn tick(&self, children: &[Node]) -> TickResult {
        let result = self.tick.tick(children);
        if !matches!(result, Ok(Status::Running)) {
            *lock(&self.recorded) = Some(result.clone());
        }
        result
    }
}

struct Replay(TickResult);

impl Tick for Replay {
    fn tick(&self, _children: &[Node]) -> TickResult {
        self.0.clone()
    }
}
