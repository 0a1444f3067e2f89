//! Configuration System
//!
//! Layered configuration for walks and logging. Sources are merged with the
//! `config` crate: built-in defaults, the global file, workspace files and
//! finally `LSTREE_` environment variables.

use crate::logging::LoggingConfig;
use crate::tree::walker::WalkOptions;
use serde::{Deserialize, Serialize};

mod facade;
mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod workspace_file;
}

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LsTreeConfig {
    /// Walk behaviour
    #[serde(default)]
    pub walk: WalkConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Walk defaults applied when the caller does not pass explicit options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Fail on relevant uninitialized submodules
    #[serde(default)]
    pub strict: bool,

    /// Log every classification decision at debug level
    #[serde(default)]
    pub trace_decisions: bool,
}

impl From<&WalkConfig> for WalkOptions {
    fn from(config: &WalkConfig) -> Self {
        WalkOptions {
            strict: config.strict,
            trace_decisions: config.trace_decisions,
        }
    }
}

impl From<WalkConfig> for WalkOptions {
    fn from(config: WalkConfig) -> Self {
        WalkOptions::from(&config)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LsTreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions::from(&self.walk)
    }
}
