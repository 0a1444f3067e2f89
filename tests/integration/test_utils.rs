//! Shared test utilities for integration tests
//!
//! Builders for throw-away git repositories (through git2) and in-memory
//! repositories with submodules.

#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use lstree::tree::{MemoryNode, MemoryRepository, RepositoryHandle};
use lstree::ObjectId;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Initialize an empty repository in a fresh temporary directory.
pub fn init_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();
    (temp_dir, repo)
}

/// Write `files` into the working tree, stage them and commit on HEAD.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)]) -> Oid {
    let workdir = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (name, content) in files {
        let file_path = workdir.join(name);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, content).unwrap();
        index.add_path(Path::new(name)).unwrap();
    }
    index.write().unwrap();
    commit_index(repo, "commit")
}

/// Commit the current index on HEAD, with HEAD's commit as parent if any.
pub fn commit_index(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("test", "test@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Add the repository at `source` as a submodule mounted at `mount_path`,
/// clone it, and commit the gitlink.
pub fn add_submodule(repo: &Repository, source: &Path, mount_path: &str) -> Oid {
    let url = source.to_str().unwrap();
    let mut submodule = repo.submodule(url, Path::new(mount_path), true).unwrap();
    submodule.clone(None).unwrap();
    submodule.add_finalize().unwrap();
    commit_index(repo, "add submodule")
}

/// Hex id accepted by `ls_tree`.
pub fn hex(oid: Oid) -> String {
    ObjectId::from(oid).to_hex()
}

/// In-memory repositories forming a submodule hierarchy:
///
/// ```text
/// README.md
/// src/main.rs
/// src/lib.rs
/// deps/core            -> core repo: core.rs, docs/guide.md,
///                         third_party/zlib -> zlib repo: zlib.c
///                         third_party/missing (not initialized)
/// deps/absent          -> not initialized
/// ```
pub struct Hierarchy {
    pub root: Arc<MemoryRepository>,
    pub core: Arc<MemoryRepository>,
    pub zlib: Arc<MemoryRepository>,
    pub commit: String,
}

impl Hierarchy {
    pub fn handle(&self) -> RepositoryHandle {
        self.root.clone()
    }
}

pub fn hierarchy() -> Hierarchy {
    let mut zlib = MemoryRepository::new();
    let zlib_commit = zlib.commit_paths(&[("zlib.c", MemoryNode::file("int inflate;"))]);
    let zlib = Arc::new(zlib);

    let missing_commit = ObjectId::from_bytes([3u8; 20]);
    let mut core = MemoryRepository::new();
    let core_commit = core.commit_paths(&[
        ("core.rs", MemoryNode::file("pub mod core;")),
        ("docs/guide.md", MemoryNode::file("# Guide")),
        ("third_party/zlib", MemoryNode::Gitlink(zlib_commit)),
        ("third_party/missing", MemoryNode::Gitlink(missing_commit)),
    ]);
    core.declare_submodule("third_party/zlib", Some(zlib_commit), Some(zlib.clone()));
    core.declare_submodule("third_party/missing", None, None);
    let core = Arc::new(core);

    let absent_commit = ObjectId::from_bytes([4u8; 20]);
    let mut root = MemoryRepository::new();
    let commit = root.commit_paths(&[
        ("README.md", MemoryNode::file("# Project")),
        ("src/main.rs", MemoryNode::file("fn main() {}")),
        ("src/lib.rs", MemoryNode::file("pub fn lib() {}")),
        ("deps/core", MemoryNode::Gitlink(core_commit)),
        ("deps/absent", MemoryNode::Gitlink(absent_commit)),
    ]);
    root.declare_submodule("deps/core", Some(core_commit), Some(core.clone()));
    root.declare_submodule("deps/absent", None, None);

    Hierarchy {
        root: Arc::new(root),
        core,
        zlib,
        commit: commit.to_hex(),
    }
}

/// Full paths visited by `walk`, in order.
pub fn walked_paths(result: &lstree::LsTreeResult) -> Vec<String> {
    let mut paths = Vec::new();
    result
        .walk(|entry| -> Result<(), lstree::LsTreeError> {
            paths.push(entry.full_path.clone());
            Ok(())
        })
        .unwrap();
    paths
}
