//! Tree entry records

use crate::types::{EntryMode, ObjectId};
use serde::{Deserialize, Serialize};

/// One record of a raw tree listing, as returned by a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Name within the listed tree (a single path component)
    pub name: String,
    pub mode: EntryMode,
    pub id: ObjectId,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, mode: EntryMode, id: ObjectId) -> Self {
        Self {
            name: name.into(),
            mode,
            id,
        }
    }
}

/// A selected entry, addressed by its path from the traversal root
///
/// `full_path` is relative to the top-level repository, even for entries
/// that live inside a submodule. The empty path denotes the root tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsTreeEntry {
    pub full_path: String,
    pub mode: EntryMode,
    pub id: ObjectId,
}

impl LsTreeEntry {
    pub fn new(full_path: impl Into<String>, mode: EntryMode, id: ObjectId) -> Self {
        Self {
            full_path: full_path.into(),
            mode,
            id,
        }
    }

    /// The value returned for lookups that found nothing.
    pub fn sentinel(full_path: impl Into<String>) -> Self {
        Self::new(full_path, EntryMode::Empty, ObjectId::ZERO)
    }

    pub fn is_sentinel(&self) -> bool {
        self.mode == EntryMode::Empty
    }

    /// Whether this is the whole-root entry produced by a fully matched root.
    pub fn is_root(&self) -> bool {
        self.full_path.is_empty()
    }
}
