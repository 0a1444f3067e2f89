//! In-memory object store
//!
//! A small content-addressed repository used to exercise the walker without
//! a git checkout. Object ids are derived with BLAKE3 and truncated to the
//! git id width, so identical content always yields identical ids.

use crate::error::LsTreeError;
use crate::tree::entry::TreeEntry;
use crate::tree::path;
use crate::tree::repository::{RepositoryAccess, RepositoryHandle, SubmoduleConfig};
use crate::types::{EntryMode, ObjectId, OBJECT_ID_LEN};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A node placed into a tree built with [`MemoryRepository::add_tree_from_paths`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
    File(Vec<u8>),
    Executable(Vec<u8>),
    Symlink(String),
    /// Submodule pointer to a commit in another repository
    Gitlink(ObjectId),
}

impl MemoryNode {
    pub fn file(content: impl AsRef<[u8]>) -> Self {
        MemoryNode::File(content.as_ref().to_vec())
    }
}

struct DeclaredSubmodule {
    config: SubmoduleConfig,
    repository: Option<RepositoryHandle>,
}

/// Repository whose objects live in memory
#[derive(Default)]
pub struct MemoryRepository {
    trees: HashMap<ObjectId, Vec<TreeEntry>>,
    blobs: HashMap<ObjectId, Vec<u8>>,
    commits: HashMap<ObjectId, ObjectId>,
    submodules: Vec<DeclaredSubmodule>,
    submodule_opens: AtomicUsize,
    tree_reads: AtomicUsize,
}

fn object_id(kind: &str, data: &[u8]) -> ObjectId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(kind.as_bytes());
    hasher.update(&(data.len() as u64).to_be_bytes());
    hasher.update(data);
    let digest = hasher.finalize();
    let mut bytes = [0u8; OBJECT_ID_LEN];
    bytes.copy_from_slice(&digest.as_bytes()[..OBJECT_ID_LEN]);
    ObjectId::from_bytes(bytes)
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_blob(&mut self, content: impl AsRef<[u8]>) -> ObjectId {
        let content = content.as_ref();
        let id = object_id("blob", content);
        self.blobs.insert(id, content.to_vec());
        id
    }

    /// Store a tree. Entries are kept sorted by name.
    pub fn add_tree(&mut self, mut entries: Vec<TreeEntry>) -> ObjectId {
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut serialized = Vec::new();
        for entry in &entries {
            serialized.extend_from_slice(format!("{:o} {}\0", entry.mode.git_mode(), entry.name).as_bytes());
            serialized.extend_from_slice(entry.id.as_bytes());
        }

        let id = object_id("tree", &serialized);
        self.trees.insert(id, entries);
        id
    }

    pub fn add_commit(&mut self, tree: ObjectId) -> ObjectId {
        let id = object_id("commit", tree.as_bytes());
        self.commits.insert(id, tree);
        id
    }

    /// Build nested trees from `/`-separated paths and return the root tree id.
    pub fn add_tree_from_paths<P: AsRef<str>>(&mut self, nodes: &[(P, MemoryNode)]) -> ObjectId {
        let items: Vec<(Vec<String>, MemoryNode)> = nodes
            .iter()
            .map(|(p, node)| {
                let components = path::normalize(p.as_ref())
                    .split('/')
                    .map(str::to_string)
                    .collect();
                (components, node.clone())
            })
            .collect();
        self.build_tree(items)
    }

    fn build_tree(&mut self, items: Vec<(Vec<String>, MemoryNode)>) -> ObjectId {
        let mut direct = Vec::new();
        let mut nested: BTreeMap<String, Vec<(Vec<String>, MemoryNode)>> = BTreeMap::new();

        for (mut components, node) in items {
            if components.len() == 1 {
                direct.push((components.remove(0), node));
            } else {
                let head = components.remove(0);
                nested.entry(head).or_default().push((components, node));
            }
        }

        let mut entries = Vec::new();
        for (name, node) in direct {
            let entry = match node {
                MemoryNode::File(content) => {
                    TreeEntry::new(name, EntryMode::Regular, self.add_blob(content))
                }
                MemoryNode::Executable(content) => {
                    TreeEntry::new(name, EntryMode::Executable, self.add_blob(content))
                }
                MemoryNode::Symlink(target) => {
                    TreeEntry::new(name, EntryMode::Symlink, self.add_blob(target))
                }
                MemoryNode::Gitlink(commit) => TreeEntry::new(name, EntryMode::Submodule, commit),
            };
            entries.push(entry);
        }
        for (name, children) in nested {
            let tree = self.build_tree(children);
            entries.push(TreeEntry::new(name, EntryMode::Directory, tree));
        }

        self.add_tree(entries)
    }

    /// Build a tree from paths and commit it.
    pub fn commit_paths<P: AsRef<str>>(&mut self, nodes: &[(P, MemoryNode)]) -> ObjectId {
        let tree = self.add_tree_from_paths(nodes);
        self.add_commit(tree)
    }

    /// Declare a submodule at `mount_path` checked out at `head_commit`.
    /// A `None` repository leaves it uninitialized.
    pub fn declare_submodule(
        &mut self,
        mount_path: &str,
        head_commit: Option<ObjectId>,
        repository: Option<RepositoryHandle>,
    ) {
        self.submodules.push(DeclaredSubmodule {
            config: SubmoduleConfig {
                path: path::normalize(mount_path),
                head_commit,
            },
            repository,
        });
    }

    /// Number of `open_submodule` calls served so far.
    pub fn submodule_open_count(&self) -> usize {
        self.submodule_opens.load(Ordering::Relaxed)
    }

    /// Number of `tree_entries` calls served so far.
    pub fn tree_read_count(&self) -> usize {
        self.tree_reads.load(Ordering::Relaxed)
    }
}

impl RepositoryAccess for MemoryRepository {
    fn commit_tree(&self, commit: &ObjectId) -> Result<ObjectId, LsTreeError> {
        self.commits
            .get(commit)
            .copied()
            .ok_or_else(|| LsTreeError::NotFound(format!("commit {}", commit)))
    }

    fn tree_entries(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>, LsTreeError> {
        self.tree_reads.fetch_add(1, Ordering::Relaxed);
        self.trees
            .get(tree)
            .cloned()
            .ok_or_else(|| LsTreeError::object_read(tree, "tree not found"))
    }

    fn submodules(&self) -> Result<Vec<SubmoduleConfig>, LsTreeError> {
        Ok(self.submodules.iter().map(|s| s.config.clone()).collect())
    }

    fn open_submodule(&self, submodule_path: &str) -> Result<Option<RepositoryHandle>, LsTreeError> {
        self.submodule_opens.fetch_add(1, Ordering::Relaxed);
        let declared = self
            .submodules
            .iter()
            .find(|s| s.config.path == submodule_path)
            .ok_or_else(|| {
                LsTreeError::NotFound(format!("submodule {} is not declared", submodule_path))
            })?;
        Ok(declared.repository.clone())
    }

    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>, LsTreeError> {
        self.blobs
            .get(id)
            .cloned()
            .ok_or_else(|| LsTreeError::object_read(id, "blob not found"))
    }
}
