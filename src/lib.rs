//! lstree: matcher-driven git tree selection across submodules
//!
//! Selects the entries of a commit accepted by a path matcher, descending
//! into initialized submodules at the commit they are pinned to, and
//! derives a deterministic checksum from the selection.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tree;
pub mod types;

pub use error::LsTreeError;
pub use tree::{ls_tree, LsTreeEntry, LsTreeResult, PathMatcher, WalkOptions};
pub use types::{EntryMode, ObjectId};
