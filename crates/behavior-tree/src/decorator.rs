//! Decorator ticks.
//!
//! Decorators wrap a single tick and modify its result. This module provides
//! [`Not`] (NOT logic).

use crate::{Node, Tick, TickRef, TickResult};

/// Inverts the result of the wrapped tick.
///
/// # Semantics
///
/// - `Success` becomes `Failure` and vice versa
/// - `Running` passes through unchanged
/// - Errors propagate unchanged
///
/// This is analogous to a logical NOT (!) operation.
pub struct Not {
    inner: TickRef,
}

impl Not {
    /// Creates a new inverter around the given tick.
    pub fn new(inner: TickRef) -> Self {
        Self { inner }
    }
}

impl Tick for Not {
    fn tick(&self, children: &[Node]) -> TickResult {
        self.inner.tick(children).map(|status| status.invert())
    }
}
