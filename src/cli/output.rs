//! CLI output: entry rendering and error mapping.

use crate::error::LsTreeError;
use crate::tree::entry::LsTreeEntry;
use crate::tree::path;
use serde_json::json;

/// What a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Text(String),
    Bytes(Vec<u8>),
}

/// `mode id path`, as printed by `git ls-tree`
pub fn format_entry_text(entry: &LsTreeEntry) -> String {
    format!(
        "{:06o} {} {}",
        entry.mode.git_mode(),
        entry.id,
        path::display(&entry.full_path)
    )
}

pub fn format_entry_json(entry: &LsTreeEntry) -> Result<String, LsTreeError> {
    Ok(serde_json::to_string(entry)?)
}

pub(crate) fn format_uninitialized_text(submodule_path: &str) -> String {
    format!("uninitialized {}", submodule_path)
}

pub(crate) fn format_uninitialized_json(submodule_path: &str) -> String {
    json!({ "uninitialized_submodule": submodule_path }).to_string()
}

/// Map an error to a user-facing message.
pub fn map_error(err: &LsTreeError) -> String {
    match err {
        LsTreeError::UnresolvedSubmodule { path } => format!(
            "Submodule {} is not initialized (run `git submodule update --init {}` or drop --strict)",
            path, path
        ),
        LsTreeError::NotFound(what) => format!("Not found: {}", what),
        LsTreeError::TypeMismatch { path, mode } => {
            format!("{} is a {} entry and has no content", path, mode)
        }
        other => other.to_string(),
    }
}
