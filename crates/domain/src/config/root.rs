use super::{EngineConfig, LoggingConfig};
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a JSON file; no path means all defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let bytes = std::fs::read(path).map_err(|e| DomainError::IoError(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::InvalidConfig(e.to_string()))
    }
}
