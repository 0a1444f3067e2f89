//! Entry points for assembling an [`LsTreeConfig`] from layered sources.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::LsTreeConfig;
use crate::error::LsTreeError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, workspace files,
    /// `LSTREE_` environment variables.
    pub fn load(workspace_root: &Path) -> Result<LsTreeConfig, LsTreeError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: LsTreeConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            strict = config.walk.strict,
            trace_decisions = config.walk.trace_decisions,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults.
    /// Environment variables still apply.
    pub fn load_from_file(path: &Path) -> Result<LsTreeConfig, LsTreeError> {
        if !path.exists() {
            return Err(LsTreeError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Built-in defaults only.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> LsTreeConfig {
        LsTreeConfig::default()
    }
}
