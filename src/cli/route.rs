//! CLI route: single route table and run context. Dispatches to the tree engine and output.

use crate::cli::output::{
    format_entry_json, format_entry_text, format_uninitialized_json, format_uninitialized_text,
    CommandOutput,
};
use crate::cli::parse::{Cli, Commands};
use crate::config::{ConfigLoader, LsTreeConfig};
use crate::error::LsTreeError;
use crate::tree::git::GitRepository;
use crate::tree::matcher::SimplePathMatcher;
use crate::tree::repository::RepositoryHandle;
use crate::tree::result::LsTreeResult;
use crate::tree::walker::{ls_tree, WalkOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Runtime context for CLI execution: opened repository and effective configuration.
pub struct RunContext {
    git: Arc<GitRepository>,
    config: LsTreeConfig,
}

impl RunContext {
    /// Load configuration for `cli` and apply flag overrides on top.
    ///
    /// An explicit `--config` file replaces the global and workspace files.
    pub fn load_config(cli: &Cli) -> Result<LsTreeConfig, LsTreeError> {
        let mut config = match cli.config {
            Some(ref config_path) => ConfigLoader::load_from_file(config_path)?,
            None => ConfigLoader::load(&cli.repo)?,
        };

        if cli.strict {
            config.walk.strict = true;
        }
        if cli.trace {
            config.walk.trace_decisions = true;
            config.logging.enabled = true;
            config.logging.level = "debug".to_string();
        }
        if cli.verbose {
            config.logging.enabled = true;
            config.logging.level = "debug".to_string();
        }
        if let Some(ref level) = cli.log_level {
            config.logging.enabled = true;
            config.logging.level = level.clone();
        }
        if let Some(ref format) = cli.log_format {
            config.logging.format = format.clone();
        }

        Ok(config)
    }

    /// Open the repository containing `repo_path`.
    pub fn new(repo_path: &Path, config: LsTreeConfig) -> Result<Self, LsTreeError> {
        let git = GitRepository::discover(repo_path)?;
        debug!(workdir = ?git.workdir(), "Repository opened");
        Ok(Self {
            git: Arc::new(git),
            config,
        })
    }

    pub fn config(&self) -> &LsTreeConfig {
        &self.config
    }

    fn handle(&self) -> RepositoryHandle {
        self.git.clone()
    }

    fn select(&self, cli: &Cli, commit: &str) -> Result<LsTreeResult, LsTreeError> {
        let commit_id = self.git.resolve_commit(commit)?;
        let matcher = SimplePathMatcher::new(&cli.base, &cli.include, &cli.exclude)?;
        ls_tree(
            self.handle(),
            &commit_id.to_hex(),
            &matcher,
            &self.config.walk_options(),
        )
    }

    /// Run one command.
    #[instrument(skip(self, cli), fields(command = ?cli.command))]
    pub fn execute(&self, cli: &Cli) -> Result<CommandOutput, LsTreeError> {
        match &cli.command {
            Commands::Ls { commit, json } => {
                let result = self.select(cli, commit)?;
                let mut lines = Vec::new();
                result.walk(|entry| {
                    lines.push(if *json {
                        format_entry_json(entry)?
                    } else {
                        format_entry_text(entry)
                    });
                    Ok::<(), LsTreeError>(())
                })?;
                for submodule_path in result.uninitialized_submodule_paths() {
                    lines.push(if *json {
                        format_uninitialized_json(submodule_path)
                    } else {
                        format_uninitialized_text(submodule_path)
                    });
                }
                Ok(CommandOutput::Text(lines.join("\n")))
            }
            Commands::Checksum { commit } => {
                let result = self.select(cli, commit)?;
                Ok(CommandOutput::Text(result.checksum()))
            }
            Commands::Cat { commit, path } => {
                let result = self.select(cli, commit)?;
                // Narrow whole-directory selections down to the requested file.
                let narrowed = result.filter(
                    &SimplePathMatcher::with_base(path),
                    &WalkOptions {
                        strict: false,
                        ..self.config.walk_options()
                    },
                )?;
                Ok(CommandOutput::Bytes(narrowed.entry_content(path)?))
            }
        }
    }
}
