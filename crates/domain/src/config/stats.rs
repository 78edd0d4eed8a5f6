use serde::{Deserialize, Serialize};

/// Timing aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Collect per-call timing samples (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Capacity of the bounded sample queue. When the queue is full, samples
    /// are dropped rather than blocking the rewrite path.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    1024
}
