//! Error types for tree selection, lookup and checksum computation.

use crate::types::{EntryMode, ObjectId};
use thiserror::Error;

/// Errors surfaced by walks, filters and content lookups
#[derive(Debug, Error)]
pub enum LsTreeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Submodule is not initialized: {path}")]
    UnresolvedSubmodule { path: String },

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry {path} is a {mode} entry, expected a blob")]
    TypeMismatch { path: String, mode: EntryMode },

    /// Errors coming out of libgit2 that have no more specific mapping.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LsTreeError {
    /// Wrap a failed object read, keeping the object id in the message.
    pub fn object_read(id: &ObjectId, detail: impl std::fmt::Display) -> Self {
        LsTreeError::Io {
            context: format!("object {}", id),
            source: std::io::Error::new(std::io::ErrorKind::Other, detail.to_string()),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        LsTreeError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for LsTreeError {
    fn from(err: config::ConfigError) -> Self {
        LsTreeError::Config(err.to_string())
    }
}
