//! Node, tick and status contract for concurrent behavior trees.
//!
//! This library provides the building blocks the runtime crate composes:
//! a tree of [`Node`]s, each expanded once per control cycle into a [`Tick`]
//! that evaluates to one of three statuses.
//!
//! - **Three statuses**: a tick may report [`Status::Running`] when it cannot
//!   finish within one call
//! - **Errors are values**: a tick returns `Result<Status, Error>`, and an error
//!   always counts as a failure
//! - **Dynamic trees**: nodes are factories, re-expanded on every tick
//!
//! # Architecture
//!
//! - [`Tick`]: Core trait for node logic
//! - [`Node`]: Factory producing a tick and its children
//! - [`Status`]: Running, Success or Failure
//! - Composite ticks: [`Sequence`], [`Selector`], [`All`]
//! - Decorator ticks: [`Not`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::{Node, Tick, TickRef, TickResult};
pub use builder::tick_fn;
pub use composite::{All, Selector, Sequence};
pub use decorator::Not;
pub use error::{Error, Result};
pub use status::Status;
