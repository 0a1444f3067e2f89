//! Read-only access to a repository's object store
//!
//! The walker only ever reads: it resolves commits to trees, lists trees,
//! inspects declared submodules and reads blobs. Implementations are
//! expected to serialize access to non thread-safe handles internally.

use crate::error::LsTreeError;
use crate::tree::entry::TreeEntry;
use crate::types::{EntryMode, ObjectId};
use std::sync::Arc;

/// Shared handle to a repository
pub type RepositoryHandle = Arc<dyn RepositoryAccess>;

/// A submodule declared in a repository's configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleConfig {
    /// Mount path relative to the declaring repository, `/`-separated
    pub path: String,
    /// Commit currently checked out in the submodule's working tree
    pub head_commit: Option<ObjectId>,
}

/// Object store capability consumed by the tree walker
pub trait RepositoryAccess: Send + Sync {
    /// Resolve a commit to its root tree.
    ///
    /// Fails with `NotFound` when the commit is absent.
    fn commit_tree(&self, commit: &ObjectId) -> Result<ObjectId, LsTreeError>;

    /// List the direct entries of a tree.
    fn tree_entries(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>, LsTreeError>;

    /// Find the entry at `relative_path` below `tree`, descending through
    /// intermediate directories. Returns `None` when any component is absent.
    fn find_entry(
        &self,
        tree: &ObjectId,
        relative_path: &str,
    ) -> Result<Option<TreeEntry>, LsTreeError> {
        let mut current = *tree;
        let mut components = relative_path.split('/').filter(|c| !c.is_empty()).peekable();

        while let Some(component) = components.next() {
            let entry = match self
                .tree_entries(&current)?
                .into_iter()
                .find(|e| e.name == component)
            {
                Some(entry) => entry,
                None => return Ok(None),
            };

            if components.peek().is_none() {
                return Ok(Some(entry));
            }
            if entry.mode != EntryMode::Directory {
                return Ok(None);
            }
            current = entry.id;
        }

        Ok(None)
    }

    /// Submodules declared by this repository.
    fn submodules(&self) -> Result<Vec<SubmoduleConfig>, LsTreeError>;

    /// Open the repository of a declared submodule.
    ///
    /// Returns `Ok(None)` when the submodule is declared but not initialized.
    fn open_submodule(&self, path: &str) -> Result<Option<RepositoryHandle>, LsTreeError>;

    /// Read the full content of a blob.
    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>, LsTreeError>;
}
