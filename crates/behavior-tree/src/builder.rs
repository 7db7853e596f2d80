//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing verbose `Node::new(Sequence, vec![...])`,
//! you can use shorter functions like `sequence(vec![...])`.

use std::sync::Arc;

use crate::{All, Node, Not, Selector, Sequence, Tick, TickResult};

/// Pins a closure to the tick signature.
///
/// Closures passed straight to a generic `impl Tick` parameter cannot have
/// their argument lifetimes inferred; routing them through this function can.
#[inline]
pub fn tick_fn<F>(f: F) -> F
where
    F: Fn(&[Node]) -> TickResult + Send + Sync,
{
    f
}

/// Creates a childless node.
///
/// Shorthand for `Node::leaf(tick)`.
#[inline]
pub fn leaf(tick: impl Tick + 'static) -> Node {
    Node::leaf(tick)
}

/// Creates a sequence node.
///
/// Shorthand for `Node::new(Sequence, children)`.
#[inline]
pub fn sequence(children: Vec<Node>) -> Node {
    Node::new(Sequence, children)
}

/// Creates a selector node.
///
/// Shorthand for `Node::new(Selector, children)`.
#[inline]
pub fn selector(children: Vec<Node>) -> Node {
    Node::new(Selector, children)
}

/// Creates an all-must-succeed node.
///
/// Shorthand for `Node::new(All, children)`.
#[inline]
pub fn all(children: Vec<Node>) -> Node {
    Node::new(All, children)
}

/// Creates a node whose result is the inverse of `tick`.
///
/// Shorthand for `Node::new(Not::new(Arc::new(tick)), children)`.
#[inline]
pub fn not(tick: impl Tick + 'static, children: Vec<Node>) -> Node {
    Node::new(Not::new(Arc::new(tick)), children)
}
