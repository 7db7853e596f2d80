//! Driver configuration.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

/// Configuration of a [`TreeTicker`](crate::TreeTicker).
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Interval between two ticks of the root node. Must be non-zero.
    pub period: Duration,
    /// What to do when a tick overruns its period. Late ticks are dropped by
    /// default.
    pub missed_tick_behavior: MissedTickBehavior,
}

impl TickerConfig {
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(10),
            missed_tick_behavior: MissedTickBehavior::Skip,
        }
    }
}
