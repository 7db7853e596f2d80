//! Driver tasks that back the runtime.
//!
//! The ticker worker drives a single tree on a fixed period, while the manager
//! supervises many tickers under one shutdown.

mod manager;
mod ticker;

pub use manager::TickerManager;
pub use ticker::{StopOnFailure, TreeTicker};
