//! Configuration for computation-tree evaluation
//!
//! Controls parallel evaluation of the inner loops and diagnostic output.
//! Can be loaded from TOML:
//!
//! ```toml
//! parallel = true
//! parallel_threshold = 512
//! explain_trace_links = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Semantically invalid setting
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Evaluation settings
///
/// # Examples
///
/// ```
/// use tracelink_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert!(!config.parallel);
///
/// let config = EngineConfig::parallel();
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Evaluate per-tuple aggregation and per-endpoint matching on the
    /// rayon thread pool
    /// Default: false
    #[serde(default)]
    pub parallel: bool,

    /// Minimum number of work items (tuples or endpoints) before the
    /// parallel path is taken
    /// Default: 256
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Log the explanation chain of every final trace link at debug level
    /// Default: false
    #[serde(default)]
    pub explain_trace_links: bool,
}

fn default_parallel_threshold() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

impl EngineConfig {
    /// Single-threaded evaluation
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            parallel_threshold: default_parallel_threshold(),
            explain_trace_links: false,
        }
    }

    /// Parallel evaluation of large inner loops
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::sequential()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a loop over `items` work items should run in parallel
    pub fn runs_parallel(&self, items: usize) -> bool {
        self.parallel && items >= self.parallel_threshold
    }
}
