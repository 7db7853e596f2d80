use std::sync::{Arc, Mutex};

use behavior_tree::{Node, Status, Tick, TickRef, TickResult};

use super::lock;

/// Wraps a set of sibling nodes so only the advancing ones run real logic.
///
/// The returned nodes share one lock and remember the last status of each
/// sibling. A sibling whose last status was not `Running` is disabled while
/// any other sibling is `Running`: it replays its last status (`Failure` if it
/// never ran) instead of ticking. When no sibling is running, any of them may
/// tick.
///
/// [`Memorize`](crate::Memorize) gives similar guarantees with less ceremony
/// and should be preferred where both fit.
pub fn sync(nodes: Vec<Node>) -> Vec<Node> {
    let group = Arc::new(SyncGroup {
        statuses: Mutex::new(vec![None; nodes.len()]),
        nodes,
    });
    (0..group.nodes.len())
        .map(|index| {
            let group = group.clone();
            Node::from_fn(move || group.expand(index))
        })
        .collect()
}

struct SyncGroup {
    nodes: Vec<Node>,
    statuses: Mutex<Vec<Option<Status>>>,
}

impl SyncGroup {
    fn expand(self: &Arc<Self>, index: usize) -> (Option<TickRef>, Vec<Node>) {
        let statuses = lock(&self.statuses);
        let (tick, children) = self.nodes[index].expand();
        let Some(tick) = tick else {
            return (None, children);
        };

        let last = statuses[index];
        let others_running = statuses.iter().any(|status| *status == Some(Status::Running));
        if last != Some(Status::Running) && others_running {
            let replay: TickRef = Arc::new(Disabled(last.unwrap_or(Status::Failure)));
            return (Some(replay), children);
        }

        let live: TickRef = Arc::new(Gated {
            group: self.clone(),
            index,
            tick,
        });
        (Some(live), children)
    }
}

/// Replays the last status of a sibling that is not allowed to advance.
struct Disabled(Status);

impl Tick for Disabled {
    fn tick(&self, _children: &[Node]) -> TickResult {
        Ok(self.0)
    }
}

/// Runs the real logic under the group lock, recording the resulting status.
struct Gated {
    group: Arc<SyncGroup>,
    index: usize,
    tick: TickRef,
}

impl Tick for Gated {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut statuses = lock(&self.group.statuses);
        let result = self.tick.tick(children);
        statuses[self.index] = Some(match &result {
            Ok(status) => *status,
            Err(_) => Status::Failure,
        });
        result
    }
}
