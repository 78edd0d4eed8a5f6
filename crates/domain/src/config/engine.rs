use super::stats::StatsConfig;
use serde::{Deserialize, Serialize};

/// Rewrite engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// When the rule set selected by an index lookup declines to rewrite,
    /// keep probing the remaining lookup stages instead of treating that
    /// verdict as final. Off by default; turning it on restores the
    /// historical fall-through behavior.
    #[serde(default)]
    pub wildcard_fallback: bool,

    #[serde(default)]
    pub stats: StatsConfig,
}
