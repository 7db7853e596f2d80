//! Core tick and node abstractions.
//!
//! A [`Node`] is a factory: expanding it yields the logic to run (a [`Tick`])
//! together with the children that logic operates on. Expanding the same node
//! twice may produce different ticks or children, so dynamic trees are legal.
//! Nodes never own each other; composing wrappers hold cheap handles to the
//! nodes they reference.

use std::fmt;
use std::sync::Arc;

use crate::{Error, Status};

/// Outcome of a single tick. An `Err` always counts as a failure.
pub type TickResult = Result<Status, Error>;

/// Shared handle to tick logic.
pub type TickRef = Arc<dyn Tick>;

/// The logic of a behavior tree node, evaluated against its children.
///
/// Stateful ticks keep their state behind interior mutability, which is how
/// every wrapper in the runtime crate tracks progress across calls.
pub trait Tick: Send + Sync {
    /// Evaluate this tick once against the given children.
    fn tick(&self, children: &[Node]) -> TickResult;
}

/// Blanket implementation for plain closures.
impl<F> Tick for F
where
    F: Fn(&[Node]) -> TickResult + Send + Sync,
{
    #[inline]
    fn tick(&self, children: &[Node]) -> TickResult {
        self(children)
    }
}

type Factory = dyn Fn() -> (Option<TickRef>, Vec<Node>) + Send + Sync;

/// A behavior tree node.
#[derive(Clone)]
pub struct Node {
    factory: Arc<Factory>,
}

impl Node {
    /// Creates a node that always expands to the same tick and children.
    pub fn new(tick: impl Tick + 'static, children: Vec<Node>) -> Self {
        let tick: TickRef = Arc::new(tick);
        Self::from_tick_ref(Some(tick), children)
    }

    /// Creates a childless node.
    pub fn leaf(tick: impl Tick + 'static) -> Self {
        Self::new(tick, Vec::new())
    }

    /// Creates a node from an already shared (and possibly absent) tick.
    pub fn from_tick_ref(tick: Option<TickRef>, children: Vec<Node>) -> Self {
        Self::from_fn(move || (tick.clone(), children.clone()))
    }

    /// Creates a node from an arbitrary factory, which is re-run on every
    /// expansion.
    pub fn from_fn<F>(factory: F) -> Self
    where
        F: Fn() -> (Option<TickRef>, Vec<Node>) + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Expands the node into its current tick and children.
    #[inline]
    pub fn expand(&self) -> (Option<TickRef>, Vec<Node>) {
        (self.factory)()
    }

    /// Expands the node and runs its tick against its children.
    ///
    /// A node without a tick fails with [`Error::MissingTick`].
    pub fn tick(&self) -> TickResult {
        let (tick, children) = self.expand();
        match tick {
            Some(tick) => tick.tick(&children),
            None => Err(Error::MissingTick),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("factory", &Arc::as_ptr(&self.factory))
            .finish()
    }
}
