//! Notification worker configuration.

use serde::{Deserialize, Serialize};

/// Notification worker configuration.
///
/// The poll interval is a policy knob: the worker is a level-triggered
/// recheck of the reminder store, not an event-driven trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent mail-sending tasks in the dispatch pool.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between notification polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    5
}
