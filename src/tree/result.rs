//! Selections produced by a walk
//!
//! An [`LsTreeResult`] holds what was selected for one repository scope:
//! direct entries, nested results for submodules, and the mount paths of
//! relevant submodules that are not initialized. Results are never mutated
//! after construction; [`LsTreeResult::filter`] builds a new one.

use crate::error::LsTreeError;
use crate::tree::entry::LsTreeEntry;
use crate::tree::hasher;
use crate::tree::matcher::{classify_dir, PathMatcher};
use crate::tree::path;
use crate::tree::repository::RepositoryHandle;
use crate::tree::walker::{Selection, TreeWalker, WalkOptions};
use crate::types::ObjectId;
use std::fmt;
use std::ops::Deref;
use tracing::instrument;

/// Selection computed for one repository scope
pub struct LsTreeResult {
    repository: RepositoryHandle,
    repository_full_path: String,
    tree: ObjectId,
    entries: Vec<LsTreeEntry>,
    submodule_results: Vec<SubmoduleResult>,
    uninitialized_submodule_paths: Vec<String>,
}

/// Result of a nested repository, mounted at its `repository_full_path`
pub struct SubmoduleResult(LsTreeResult);

impl SubmoduleResult {
    pub fn new(result: LsTreeResult) -> Self {
        Self(result)
    }
}

impl Deref for SubmoduleResult {
    type Target = LsTreeResult;

    fn deref(&self) -> &LsTreeResult {
        &self.0
    }
}

impl LsTreeResult {
    /// Assemble a result. Entries, nested results and uninitialized paths
    /// are stored sorted so every read is deterministic.
    pub fn new(
        repository: RepositoryHandle,
        repository_full_path: String,
        tree: ObjectId,
        mut entries: Vec<LsTreeEntry>,
        mut submodule_results: Vec<SubmoduleResult>,
        mut uninitialized_submodule_paths: Vec<String>,
    ) -> Self {
        entries.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        submodule_results.sort_by(|a, b| a.repository_full_path.cmp(&b.repository_full_path));
        for p in uninitialized_submodule_paths.iter_mut() {
            *p = path::to_slash(p);
        }
        uninitialized_submodule_paths.sort();
        uninitialized_submodule_paths.dedup();

        Self {
            repository,
            repository_full_path,
            tree,
            entries,
            submodule_results,
            uninitialized_submodule_paths,
        }
    }

    pub fn repository(&self) -> &RepositoryHandle {
        &self.repository
    }

    /// Mount path of this scope; empty for the top-level repository.
    pub fn repository_full_path(&self) -> &str {
        &self.repository_full_path
    }

    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    /// Entries selected directly in this scope, sorted by full path.
    pub fn entries(&self) -> &[LsTreeEntry] {
        &self.entries
    }

    /// Nested results, sorted by mount path.
    pub fn submodule_results(&self) -> &[SubmoduleResult] {
        &self.submodule_results
    }

    /// Relevant submodules that are declared but not initialized, sorted.
    pub fn uninitialized_submodule_paths(&self) -> &[String] {
        &self.uninitialized_submodule_paths
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.submodule_results.iter().all(|r| r.is_empty())
            && self.uninitialized_submodule_paths.is_empty()
    }

    /// Narrow this selection with another matcher.
    ///
    /// Entries already held are re-classified instead of re-listing the
    /// commit, so a filter can only drop what the original walk selected.
    /// Whole-subtree entries are descended into when the new matcher needs
    /// their children.
    #[instrument(skip(self, matcher, options), fields(scope = %path::display(&self.repository_full_path), matcher = %matcher.describe()))]
    pub fn filter(
        &self,
        matcher: &dyn PathMatcher,
        options: &WalkOptions,
    ) -> Result<LsTreeResult, LsTreeError> {
        let walker = TreeWalker::new(matcher, options);
        let mut selection = Selection::default();

        for entry in &self.entries {
            let entry_selection = if entry.is_root() {
                walker.root_match(&self.repository, &self.tree, &self.repository_full_path)?
            } else {
                walker.entry_match(&self.repository, &self.repository_full_path, entry)?
            };
            selection.extend(entry_selection);
        }

        for submodule_result in &self.submodule_results {
            let filtered = submodule_result.filter(matcher, options)?;
            if !filtered.is_empty() {
                selection.submodule_results.push(SubmoduleResult::new(filtered));
            }
        }

        let uninitialized_submodule_paths = self
            .uninitialized_submodule_paths
            .iter()
            .filter(|p| classify_dir(matcher, p).is_relevant())
            .cloned()
            .collect();

        Ok(LsTreeResult::new(
            self.repository.clone(),
            self.repository_full_path.clone(),
            self.tree,
            selection.entries,
            selection.submodule_results,
            uninitialized_submodule_paths,
        ))
    }

    /// Visit every selected entry in order: this scope's entries sorted by
    /// path, then each nested result in mount path order.
    ///
    /// Stops at the first error returned by `visit`.
    pub fn walk<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&LsTreeEntry) -> Result<(), E>,
    {
        self.walk_with_result(&mut |_, entry| visit(entry))
    }

    fn walk_with_result<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&'a LsTreeResult, &'a LsTreeEntry) -> Result<(), E>,
    {
        for entry in &self.entries {
            visit(self, entry)?;
        }

        for submodule_result in &self.submodule_results {
            submodule_result.0.walk_with_result(visit)?;
        }

        Ok(())
    }

    fn find(&self, lookup_path: &str) -> Option<(&LsTreeResult, &LsTreeEntry)> {
        let mut found = None;
        let _ = self.walk_with_result(&mut |result, entry| -> Result<(), ()> {
            if entry.full_path == lookup_path {
                found = Some((result, entry));
                return Err(());
            }
            Ok(())
        });
        found
    }

    /// Look up an entry by full path.
    ///
    /// Returns a sentinel entry (empty mode, zero id) when nothing matches.
    pub fn entry(&self, lookup_path: &str) -> LsTreeEntry {
        let normalized = path::normalize(lookup_path);
        match self.find(&normalized) {
            Some((_, entry)) => entry.clone(),
            None => LsTreeEntry::sentinel(normalized),
        }
    }

    /// Read the content of the blob selected at `lookup_path`.
    ///
    /// The blob is read from the repository owning the entry, which is a
    /// submodule repository for paths below a mount point.
    pub fn entry_content(&self, lookup_path: &str) -> Result<Vec<u8>, LsTreeError> {
        let normalized = path::normalize(lookup_path);
        let (owner, entry) = self
            .find(&normalized)
            .ok_or_else(|| LsTreeError::NotFound(format!("tree entry {}", path::display(&normalized))))?;

        if !entry.mode.is_blob() {
            return Err(LsTreeError::TypeMismatch {
                path: path::display(&normalized).to_string(),
                mode: entry.mode,
            });
        }

        owner.repository.read_blob(&entry.id).map_err(|e| match e {
            LsTreeError::Io { context, source } => LsTreeError::Io {
                context: format!("tree entry {}: {}", normalized, context),
                source,
            },
            other => other,
        })
    }

    /// Deterministic digest of the selection; empty for an empty selection.
    pub fn checksum(&self) -> String {
        hasher::compute_checksum(self)
    }
}

impl fmt::Debug for LsTreeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LsTreeResult")
            .field("repository_full_path", &self.repository_full_path)
            .field("tree", &self.tree)
            .field("entries", &self.entries)
            .field("submodule_results", &self.submodule_results)
            .field(
                "uninitialized_submodule_paths",
                &self.uninitialized_submodule_paths,
            )
            .finish()
    }
}

impl fmt::Debug for SubmoduleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
