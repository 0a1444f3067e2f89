//! libgit2-backed repository access

use crate::error::LsTreeError;
use crate::tree::entry::TreeEntry;
use crate::tree::path;
use crate::tree::repository::{RepositoryAccess, RepositoryHandle, SubmoduleConfig};
use crate::types::{EntryMode, ObjectId};
use git2::{ErrorCode, Oid, Repository};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Git repository opened through libgit2
///
/// The underlying handle is not safe for concurrent use, so every call
/// takes an internal lock for its duration.
pub struct GitRepository {
    inner: Mutex<Repository>,
    workdir: Option<PathBuf>,
}

impl GitRepository {
    /// Open the repository at `path` (a working tree or a bare repository).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LsTreeError> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self::from_repository(repo))
    }

    /// Search `path` and its parents for a repository.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, LsTreeError> {
        let repo = Repository::discover(path.as_ref())?;
        Ok(Self::from_repository(repo))
    }

    pub fn from_repository(repo: Repository) -> Self {
        let workdir = repo.workdir().map(Path::to_path_buf);
        Self {
            inner: Mutex::new(repo),
            workdir,
        }
    }

    pub fn into_handle(self) -> RepositoryHandle {
        Arc::new(self)
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Resolve any revision expression (`HEAD`, a branch, a short id) to a commit id.
    pub fn resolve_commit(&self, revision: &str) -> Result<ObjectId, LsTreeError> {
        let repo = self.inner.lock();
        let object = repo.revparse_single(revision).map_err(|e| match e.code() {
            ErrorCode::NotFound => LsTreeError::NotFound(format!("revision {}", revision)),
            ErrorCode::Ambiguous | ErrorCode::InvalidSpec => {
                LsTreeError::InvalidArgument(format!("revision {:?}: {}", revision, e.message()))
            }
            _ => LsTreeError::Git(e),
        })?;
        let commit = object.peel_to_commit()?;
        Ok(commit.id().into())
    }
}

fn to_oid(id: &ObjectId) -> Result<Oid, LsTreeError> {
    Ok(Oid::from_bytes(id.as_bytes())?)
}

fn to_tree_entry(entry: &git2::TreeEntry<'_>, tree: &ObjectId) -> Result<TreeEntry, LsTreeError> {
    let name = match entry.name() {
        Some(name) => name.to_string(),
        None => String::from_utf8_lossy(entry.name_bytes()).into_owned(),
    };
    let raw_mode = entry.filemode() as u32;
    let mode = EntryMode::from_git_mode(raw_mode).ok_or_else(|| {
        LsTreeError::object_read(tree, format!("unsupported mode {:o} for entry {}", raw_mode, name))
    })?;

    Ok(TreeEntry::new(name, mode, entry.id().into()))
}

impl RepositoryAccess for GitRepository {
    fn commit_tree(&self, commit: &ObjectId) -> Result<ObjectId, LsTreeError> {
        let repo = self.inner.lock();
        let commit_obj = repo.find_commit(to_oid(commit)?).map_err(|e| match e.code() {
            ErrorCode::NotFound => LsTreeError::NotFound(format!("commit {}", commit)),
            _ => LsTreeError::Git(e),
        })?;
        Ok(commit_obj.tree_id().into())
    }

    fn tree_entries(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>, LsTreeError> {
        let repo = self.inner.lock();
        let tree_obj = repo
            .find_tree(to_oid(tree)?)
            .map_err(|e| LsTreeError::object_read(tree, e))?;

        tree_obj
            .iter()
            .map(|entry| to_tree_entry(&entry, tree))
            .collect()
    }

    fn find_entry(
        &self,
        tree: &ObjectId,
        relative_path: &str,
    ) -> Result<Option<TreeEntry>, LsTreeError> {
        let repo = self.inner.lock();
        let tree_obj = repo
            .find_tree(to_oid(tree)?)
            .map_err(|e| LsTreeError::object_read(tree, e))?;

        match tree_obj.get_path(Path::new(relative_path)) {
            Ok(entry) => Ok(Some(to_tree_entry(&entry, tree)?)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(LsTreeError::Git(e)),
        }
    }

    fn submodules(&self) -> Result<Vec<SubmoduleConfig>, LsTreeError> {
        let repo = self.inner.lock();
        let submodules = repo.submodules()?;

        Ok(submodules
            .iter()
            .map(|sm| SubmoduleConfig {
                path: path::normalize(&sm.path().to_string_lossy()),
                head_commit: sm.workdir_id().map(ObjectId::from),
            })
            .collect())
    }

    fn open_submodule(&self, submodule_path: &str) -> Result<Option<RepositoryHandle>, LsTreeError> {
        let repo = self.inner.lock();
        let submodule = repo.find_submodule(submodule_path)?;

        if submodule.workdir_id().is_none() {
            debug!(path = submodule_path, "Submodule has no checkout");
            return Ok(None);
        }

        match submodule.open() {
            Ok(sub_repo) => Ok(Some(Arc::new(GitRepository::from_repository(sub_repo)))),
            Err(e) if e.code() == ErrorCode::NotFound => {
                warn!(path = submodule_path, error = %e, "Submodule repository could not be opened");
                Ok(None)
            }
            Err(e) => Err(LsTreeError::Git(e)),
        }
    }

    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>, LsTreeError> {
        let repo = self.inner.lock();
        let blob = repo
            .find_blob(to_oid(id)?)
            .map_err(|e| LsTreeError::object_read(id, e))?;
        Ok(blob.content().to_vec())
    }
}
