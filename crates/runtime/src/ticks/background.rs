use std::collections::VecDeque;
use std::sync::Mutex;

use behavior_tree::{Node, Status, Tick, TickRef, TickResult};

use super::lock;

type Generator = dyn Fn() -> TickRef + Send + Sync;

/// Pushes running tasks into the background, letting several of them progress
/// concurrently.
///
/// On every call the backlog is ticked from oldest to newest. The first job
/// that stops running (or errors) is removed and its result returned
/// unchanged. If every job is still running, a new task is built from the
/// generator with the children of this call and ticked once: a running task
/// joins the backlog, anything else is returned directly.
///
/// The backlog is unbounded. Callers must cap it themselves, see
/// [`Background::len`].
pub struct Background {
    generator: Box<Generator>,
    jobs: Mutex<VecDeque<Node>>,
}

impl Background {
    /// Creates a pool generating one fresh tick per task, so each task may
    /// carry its own state.
    pub fn new<G>(generator: G) -> Self
    where
        G: Fn() -> TickRef + Send + Sync + 'static,
    {
        Self {
            generator: Box::new(generator),
            jobs: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of tasks currently in the backlog.
    pub fn len(&self) -> usize {
        lock(&self.jobs).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Tick for Background {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut jobs = lock(&self.jobs);

        for index in 0..jobs.len() {
            let result = jobs[index].tick();
            if matches!(result, Ok(Status::Running)) {
                continue;
            }
            jobs.remove(index);
            tracing::trace!(backlog = jobs.len(), ?result, "background job finished");
            return result;
        }

        let job = Node::from_tick_ref(Some((self.generator)()), children.to_vec());
        match job.tick() {
            Ok(Status::Running) => {
                jobs.push_back(job);
                tracing::trace!(backlog = jobs.len(), "background job queued");
                Ok(Status::Running)
            }
            result => result,
        }
    }
}
