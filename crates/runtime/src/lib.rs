//! Concurrent execution runtime for behavior trees.
//!
//! This crate makes long-running and concurrent work coexist with the
//! synchronous, three-valued tick contract of [`behavior_tree`]. Wrappers
//! convert blocking operations into resumable state machines that report
//! `Running` until done, and drivers tick whole trees on a schedule under
//! unified cancellation and error reporting.
//!
//! Modules are organized by responsibility:
//! - [`ticks`] hosts the stateful tick wrappers ([`Async`], [`sync()`],
//!   [`Fork`], [`Background`], [`Memorize`], [`Any`], [`Context`])
//! - [`api`] exposes the driver traits and error types clients interact with
//! - [`config`] carries driver configuration
//! - `workers` keeps the driver tasks ([`TreeTicker`], [`StopOnFailure`],
//!   [`TickerManager`]) internal to the crate
pub mod api;
pub mod config;
pub mod ticks;

mod workers;

pub use api::{Done, DoneSignal, Manager, Result, RuntimeError, Ticker};
pub use config::TickerConfig;
pub use ticks::{Any, Async, Background, Context, Fork, Memorize, sync};
pub use workers::{StopOnFailure, TickerManager, TreeTicker};
