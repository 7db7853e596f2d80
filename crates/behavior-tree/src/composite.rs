//! Stateless composite ticks.
//!
//! Composite ticks control how the children of a node are evaluated. They keep
//! no state between calls: a `Running` child simply makes the composite report
//! `Running`, and the next call starts from the first child again. Pair them
//! with the memoizing wrappers of the runtime crate to drive asynchronous
//! children.

use crate::{Error, Node, Status, Tick, TickResult};

/// Ticks children in order until one fails.
///
/// # Semantics
///
/// A `Sequence` evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `Running`, the sequence stops and returns `Running`
/// - If a child returns an error, the sequence stops and returns it, tagged with the child index
/// - If all children return `Success`, the sequence returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequence;

impl Tick for Sequence {
    fn tick(&self, children: &[Node]) -> TickResult {
        for (index, child) in children.iter().enumerate() {
            match child.tick() {
                Err(err) => return Err(child_error("Sequence", index, err)),
                Ok(Status::Running) => return Ok(Status::Running),
                Ok(Status::Failure) => return Ok(Status::Failure),
                Ok(Status::Success) => continue,
            }
        }
        Ok(Status::Success)
    }
}

/// Ticks children in order until one succeeds.
///
/// # Semantics
///
/// A `Selector` evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Running`, the selector stops and returns `Running`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector;

impl Tick for Selector {
    fn tick(&self, children: &[Node]) -> TickResult {
        for (index, child) in children.iter().enumerate() {
            match child.tick() {
                Err(err) => return Err(child_error("Selector", index, err)),
                Ok(Status::Running) => return Ok(Status::Running),
                Ok(Status::Success) => return Ok(Status::Success),
                Ok(Status::Failure) => continue,
            }
        }
        Ok(Status::Failure)
    }
}

/// Ticks every child, succeeding only if all of them succeed.
///
/// Unlike [`Sequence`], a failing child does not stop evaluation of its
/// siblings. Errors and `Running` still return immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

impl Tick for All {
    fn tick(&self, children: &[Node]) -> TickResult {
        let mut success = true;
        for child in children {
            match child.tick()? {
                Status::Running => return Ok(Status::Running),
                Status::Success => {}
                Status::Failure => success = false,
            }
        }
        if success {
            Ok(Status::Success)
        } else {
            Ok(Status::Failure)
        }
    }
}

fn child_error(tick: &'static str, index: usize, err: Error) -> Error {
    Error::Child {
        tick,
        index,
        source: Box::new(err),
    }
}
