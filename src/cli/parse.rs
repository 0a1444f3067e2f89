//! CLI parse: clap types for lstree. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lstree - select git tree entries through submodules and checksum them
#[derive(Parser, Debug)]
#[command(name = "lstree")]
#[command(about = "List, checksum and read matched git tree entries across submodules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository (or any directory inside it)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fail when a relevant submodule is not initialized
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log every classification decision (implies debug logging)
    #[arg(long, global = true)]
    pub trace: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Base path every selected entry must lie under
    #[arg(long, global = true, default_value = "")]
    pub base: String,

    /// Include glob relative to the base path (repeatable)
    #[arg(long = "include", global = true)]
    pub include: Vec<String>,

    /// Exclude glob relative to the base path (repeatable)
    #[arg(long = "exclude", global = true)]
    pub exclude: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List selected entries, then unresolved submodules
    Ls {
        /// Commit or any revision git can resolve
        commit: String,
        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Print the checksum of the selection (empty for an empty selection)
    Checksum {
        /// Commit or any revision git can resolve
        commit: String,
    },
    /// Write the content of a selected file to stdout
    Cat {
        /// Commit or any revision git can resolve
        commit: String,
        /// Path from the repository root
        path: String,
    },
}
