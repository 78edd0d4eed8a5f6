//! httpse Domain Layer
pub mod config;
pub mod errors;
pub mod ruleset;
pub mod target;

pub use config::{Config, EngineConfig, LoggingConfig, StatsConfig};
pub use errors::DomainError;
pub use ruleset::{ExclusionRecord, RuleRecord, RulesetRecord, TargetRecord};
pub use target::TargetHost;
