//! httpse rewrite engine.
//!
//! Deserializes the embedded rule-set bundle, builds the exact-host and
//! wildcard indexes, and answers `rewrite(url) -> (String, bool)` queries
//! against them. Timing samples flow to a single-consumer aggregator off the
//! hot path.

pub mod compiler;
pub mod index;
pub mod rewriter;
pub mod ruleset;
pub mod stats;

pub use compiler::{compile_rule_index, decode_bundle, encode_bundle, normalize_replacement};
pub use index::RuleIndex;
pub use rewriter::{Rewriter, EMBEDDED_RULESETS};
pub use ruleset::{CompiledRuleset, Exclusion, Rule};
pub use stats::{RewriteStats, StatsAggregator, StatsEmitter, TimingSample};
