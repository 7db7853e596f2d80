//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on tick wrappers and driver workers.

pub mod errors;
pub mod ticker;

pub use errors::{Result, RuntimeError};
pub use ticker::{Done, DoneSignal, Manager, Ticker};
