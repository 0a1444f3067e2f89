//! Git Tree Selection
//!
//! Walks a commit's tree with a path matcher, follows submodules through
//! their recorded gitlinks, and produces a selection that can be narrowed,
//! walked, read from and checksummed.

pub mod entry;
pub mod git;
pub mod hasher;
pub mod matcher;
pub mod memory;
pub mod path;
pub mod repository;
pub mod result;
pub mod walker;

pub use entry::{LsTreeEntry, TreeEntry};
pub use git::GitRepository;
pub use matcher::{DirDecision, FalsePathMatcher, PathMatcher, SimplePathMatcher, TruePathMatcher};
pub use memory::{MemoryNode, MemoryRepository};
pub use repository::{RepositoryAccess, RepositoryHandle, SubmoduleConfig};
pub use result::{LsTreeResult, SubmoduleResult};
pub use walker::{ls_tree, WalkOptions};
