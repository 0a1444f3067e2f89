//! Matcher-driven descent over git trees
//!
//! Turns a commit, a [`PathMatcher`] and the commit's submodule structure
//! into an [`LsTreeResult`]. Directories and submodules are either taken
//! whole, descended into, or pruned; files are selected one by one.
//! Submodules are followed through the gitlink recorded in the walked tree
//! and every produced path is rebased onto the top-level repository.

use crate::error::LsTreeError;
use crate::tree::entry::LsTreeEntry;
use crate::tree::matcher::{classify_dir, DirDecision, PathMatcher};
use crate::tree::path;
use crate::tree::repository::RepositoryHandle;
use crate::tree::result::{LsTreeResult, SubmoduleResult};
use crate::types::{EntryMode, ObjectId};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Fail on relevant submodules that are not initialized instead of
    /// recording them.
    pub strict: bool,
    /// Emit a debug event for every classification decision.
    pub trace_decisions: bool,
}

impl WalkOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Entries and nested results collected for one repository scope.
#[derive(Default)]
pub(crate) struct Selection {
    pub(crate) entries: Vec<LsTreeEntry>,
    pub(crate) submodule_results: Vec<SubmoduleResult>,
}

impl Selection {
    fn entry(entry: LsTreeEntry) -> Self {
        Self {
            entries: vec![entry],
            submodule_results: Vec::new(),
        }
    }

    pub(crate) fn extend(&mut self, other: Selection) {
        self.entries.extend(other.entries);
        self.submodule_results.extend(other.submodule_results);
    }

    fn push_submodule(&mut self, result: LsTreeResult) {
        if !result.is_empty() {
            self.submodule_results.push(SubmoduleResult::new(result));
        }
    }
}

/// Select the entries of `commit` in `repository` accepted by `matcher`.
///
/// Fails with `InvalidArgument` for a malformed commit id, `NotFound` when
/// the commit is absent, and `UnresolvedSubmodule` in strict mode when a
/// relevant submodule is not initialized.
#[instrument(skip(repository, matcher, options), fields(matcher = %matcher.describe(), strict = options.strict))]
pub fn ls_tree(
    repository: RepositoryHandle,
    commit: &str,
    matcher: &dyn PathMatcher,
    options: &WalkOptions,
) -> Result<LsTreeResult, LsTreeError> {
    let start = Instant::now();
    let commit_id = ObjectId::from_hex(commit)?;
    let tree = repository.commit_tree(&commit_id)?;
    let walker = TreeWalker::new(matcher, options);

    let uninitialized = walker.uninitialized_submodule_paths(&repository, "")?;

    let base_filepath = path::normalize(matcher.base_filepath());
    let selection = if !base_filepath.is_empty() {
        walker.specific_entry(&repository, &tree, "", &base_filepath)?
    } else {
        walker.root_match(&repository, &tree, "")?
    };

    let result = LsTreeResult::new(
        repository,
        String::new(),
        tree,
        selection.entries,
        selection.submodule_results,
        uninitialized,
    );

    info!(
        entries = result.entries().len(),
        submodules = result.submodule_results().len(),
        uninitialized_submodules = result.uninitialized_submodule_paths().len(),
        duration_ms = start.elapsed().as_millis(),
        "ls-tree completed"
    );

    Ok(result)
}

/// Classification state shared by a walk or a filter pass
pub(crate) struct TreeWalker<'a> {
    matcher: &'a dyn PathMatcher,
    options: &'a WalkOptions,
}

impl<'a> TreeWalker<'a> {
    pub(crate) fn new(matcher: &'a dyn PathMatcher, options: &'a WalkOptions) -> Self {
        Self { matcher, options }
    }

    fn trace(&self, kind: &str, full_path: &str, decision: DirDecision) {
        if self.options.trace_decisions {
            debug!(
                kind,
                path = path::display(full_path),
                decision = decision.as_str(),
                "Tree entry classified"
            );
        }
    }

    fn trace_uninitialized(&self, full_path: &str) {
        if self.options.trace_decisions {
            debug!(
                path = path::display(full_path),
                init_required = true,
                "Submodule is not initialized: path will be added to checksum"
            );
        }
    }

    /// Classify the root of a repository scope.
    pub(crate) fn root_match(
        &self,
        repository: &RepositoryHandle,
        tree: &ObjectId,
        repository_full_path: &str,
    ) -> Result<Selection, LsTreeError> {
        let decision = classify_dir(self.matcher, repository_full_path);
        self.trace("root", repository_full_path, decision);

        match decision {
            DirDecision::Added => Ok(Selection::entry(LsTreeEntry::new(
                repository_full_path,
                EntryMode::Directory,
                *tree,
            ))),
            DirDecision::Checking => {
                self.walk_tree(repository, tree, repository_full_path, repository_full_path)
            }
            DirDecision::Skipped => Ok(Selection::default()),
        }
    }

    /// Classify every entry of `tree`, which is mounted at `tree_full_path`.
    pub(crate) fn walk_tree(
        &self,
        repository: &RepositoryHandle,
        tree: &ObjectId,
        repository_full_path: &str,
        tree_full_path: &str,
    ) -> Result<Selection, LsTreeError> {
        let mut selection = Selection::default();

        for tree_entry in repository.tree_entries(tree)? {
            let entry = LsTreeEntry::new(
                path::join(tree_full_path, &tree_entry.name),
                tree_entry.mode,
                tree_entry.id,
            );
            selection.extend(self.entry_match(repository, repository_full_path, &entry)?);
        }

        Ok(selection)
    }

    /// Classify a single entry according to its type.
    pub(crate) fn entry_match(
        &self,
        repository: &RepositoryHandle,
        repository_full_path: &str,
        entry: &LsTreeEntry,
    ) -> Result<Selection, LsTreeError> {
        match entry.mode {
            EntryMode::Directory => self.dir_entry_match(repository, repository_full_path, entry),
            EntryMode::Submodule => {
                self.submodule_entry_match(repository, repository_full_path, entry)
            }
            EntryMode::Regular | EntryMode::Executable | EntryMode::Symlink => {
                Ok(self.file_entry_match(entry))
            }
            EntryMode::Empty => Ok(Selection::default()),
        }
    }

    fn dir_entry_match(
        &self,
        repository: &RepositoryHandle,
        repository_full_path: &str,
        entry: &LsTreeEntry,
    ) -> Result<Selection, LsTreeError> {
        let decision = classify_dir(self.matcher, &entry.full_path);
        self.trace("dir", &entry.full_path, decision);

        match decision {
            DirDecision::Added => Ok(Selection::entry(entry.clone())),
            DirDecision::Checking => {
                self.walk_tree(repository, &entry.id, repository_full_path, &entry.full_path)
            }
            DirDecision::Skipped => Ok(Selection::default()),
        }
    }

    fn submodule_entry_match(
        &self,
        repository: &RepositoryHandle,
        repository_full_path: &str,
        entry: &LsTreeEntry,
    ) -> Result<Selection, LsTreeError> {
        let decision = classify_dir(self.matcher, &entry.full_path);
        self.trace("submodule", &entry.full_path, decision);

        match decision {
            DirDecision::Added => Ok(Selection::entry(entry.clone())),
            DirDecision::Skipped => Ok(Selection::default()),
            DirDecision::Checking => {
                let submodule_path = path::rebase(repository_full_path, &entry.full_path);
                let opened = self.submodule_repository_and_tree(
                    repository,
                    submodule_path,
                    &entry.id,
                    &entry.full_path,
                )?;

                let (submodule_repository, submodule_tree) = match opened {
                    Some(opened) => opened,
                    None if self.options.strict => {
                        return Err(LsTreeError::UnresolvedSubmodule {
                            path: entry.full_path.clone(),
                        })
                    }
                    None => {
                        self.trace_uninitialized(&entry.full_path);
                        return Ok(Selection::default());
                    }
                };

                let nested = self.walk_tree(
                    &submodule_repository,
                    &submodule_tree,
                    &entry.full_path,
                    &entry.full_path,
                )?;

                let mut selection = Selection::default();
                selection.push_submodule(LsTreeResult::new(
                    submodule_repository,
                    entry.full_path.clone(),
                    submodule_tree,
                    nested.entries,
                    nested.submodule_results,
                    Vec::new(),
                ));
                Ok(selection)
            }
        }
    }

    fn file_entry_match(&self, entry: &LsTreeEntry) -> Selection {
        if self.matcher.match_path(&entry.full_path) {
            self.trace("file", &entry.full_path, DirDecision::Added);
            Selection::entry(entry.clone())
        } else {
            self.trace("file", &entry.full_path, DirDecision::Skipped);
            Selection::default()
        }
    }

    /// Resolve a single path, crossing into submodules as needed.
    ///
    /// `entry_path` is relative to the repository mounted at
    /// `repository_full_path`. An uninitialized submodule on the way ends
    /// the lookup with an empty selection.
    pub(crate) fn specific_entry(
        &self,
        repository: &RepositoryHandle,
        tree: &ObjectId,
        repository_full_path: &str,
        entry_path: &str,
    ) -> Result<Selection, LsTreeError> {
        for submodule in repository.submodules()? {
            let inner_path = match path::relative_to(&submodule.path, entry_path) {
                Some(inner_path) => inner_path,
                None => continue,
            };
            let submodule_full_path = path::join(repository_full_path, &submodule.path);

            let gitlink = match repository.find_entry(tree, &submodule.path)? {
                Some(tree_entry) if tree_entry.mode == EntryMode::Submodule => tree_entry.id,
                _ => {
                    debug!(
                        path = %submodule_full_path,
                        "Submodule is declared but not recorded in the tree"
                    );
                    return Ok(Selection::default());
                }
            };

            let opened = self.submodule_repository_and_tree(
                repository,
                &submodule.path,
                &gitlink,
                &submodule_full_path,
            )?;
            let (submodule_repository, submodule_tree) = match opened {
                Some(opened) => opened,
                None => {
                    self.trace_uninitialized(&submodule_full_path);
                    return Ok(Selection::default());
                }
            };

            let nested = self.specific_entry(
                &submodule_repository,
                &submodule_tree,
                &submodule_full_path,
                inner_path,
            )?;

            let mut selection = Selection::default();
            selection.push_submodule(LsTreeResult::new(
                submodule_repository,
                submodule_full_path,
                submodule_tree,
                nested.entries,
                nested.submodule_results,
                Vec::new(),
            ));
            return Ok(selection);
        }

        match repository.find_entry(tree, entry_path)? {
            Some(tree_entry) => {
                let entry = LsTreeEntry::new(
                    path::join(repository_full_path, entry_path),
                    tree_entry.mode,
                    tree_entry.id,
                );
                self.entry_match(repository, repository_full_path, &entry)
            }
            None => Ok(Selection::default()),
        }
    }

    /// Open a submodule and resolve the tree of its recorded commit.
    ///
    /// Returns `None` when the submodule is not initialized.
    fn submodule_repository_and_tree(
        &self,
        repository: &RepositoryHandle,
        submodule_path: &str,
        gitlink: &ObjectId,
        submodule_full_path: &str,
    ) -> Result<Option<(RepositoryHandle, ObjectId)>, LsTreeError> {
        let submodule_repository = match repository.open_submodule(submodule_path)? {
            Some(submodule_repository) => submodule_repository,
            None => return Ok(None),
        };

        let tree = submodule_repository
            .commit_tree(gitlink)
            .map_err(|e| match e {
                LsTreeError::NotFound(_) => LsTreeError::NotFound(format!(
                    "submodule {} commit {}",
                    submodule_full_path, gitlink
                )),
                other => other,
            })?;

        if self.options.trace_decisions {
            self.trace_submodule_head(repository, submodule_path, gitlink, submodule_full_path)?;
        }

        Ok(Some((submodule_repository, tree)))
    }

    /// Report the submodule's checked-out commit next to its gitlink.
    fn trace_submodule_head(
        &self,
        repository: &RepositoryHandle,
        submodule_path: &str,
        gitlink: &ObjectId,
        submodule_full_path: &str,
    ) -> Result<(), LsTreeError> {
        let head = repository
            .submodules()?
            .into_iter()
            .find(|submodule| submodule.path == submodule_path)
            .and_then(|submodule| submodule.head_commit);

        match head {
            Some(head) if head != *gitlink => debug!(
                path = submodule_full_path,
                current_commit = %head,
                expected_commit = %gitlink,
                init_required = false,
                "Submodule is not clean: expected commit will be checked"
            ),
            _ => debug!(
                path = submodule_full_path,
                commit = %gitlink,
                init_required = false,
                "Submodule resolved to recorded commit"
            ),
        }
        Ok(())
    }

    /// Full paths of relevant submodules that are declared but not
    /// initialized, searched recursively through initialized ones.
    pub(crate) fn uninitialized_submodule_paths(
        &self,
        repository: &RepositoryHandle,
        repository_full_path: &str,
    ) -> Result<Vec<String>, LsTreeError> {
        let mut paths = Vec::new();

        for submodule in repository.submodules()? {
            let submodule_full_path = path::join(repository_full_path, &submodule.path);
            if !classify_dir(self.matcher, &submodule_full_path).is_relevant() {
                continue;
            }

            match repository.open_submodule(&submodule.path)? {
                Some(submodule_repository) => {
                    paths.extend(
                        self.uninitialized_submodule_paths(
                            &submodule_repository,
                            &submodule_full_path,
                        )?,
                    );
                }
                None if self.options.strict => {
                    return Err(LsTreeError::UnresolvedSubmodule {
                        path: submodule_full_path,
                    });
                }
                None => {
                    self.trace_uninitialized(&submodule_full_path);
                    paths.push(submodule_full_path);
                }
            }
        }

        Ok(paths)
    }
}
