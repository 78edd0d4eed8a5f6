//! Configuration for the httpse workspace, organized by concern:
//! - `root`: top-level configuration and file loading
//! - `engine`: rewrite engine knobs
//! - `stats`: timing aggregation
//! - `logging`: logging settings

pub mod engine;
pub mod logging;
pub mod root;
pub mod stats;

pub use engine::EngineConfig;
pub use logging::LoggingConfig;
pub use root::Config;
pub use stats::StatsConfig;
