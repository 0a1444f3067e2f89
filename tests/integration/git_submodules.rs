//! Integration tests for submodules in real git repositories

use crate::integration::test_utils::{add_submodule, commit_files, hex, init_repo, walked_paths};
use lstree::tree::{GitRepository, SimplePathMatcher};
use lstree::{ls_tree, EntryMode, LsTreeError, WalkOptions};
use std::fs;
use std::sync::Arc;

fn txt_matcher() -> SimplePathMatcher {
    SimplePathMatcher::new("", ["**/*.txt"], Vec::<&str>::new()).unwrap()
}

/// Files inside an initialized submodule are reported under its mount path
#[test]
fn test_walk_descends_into_initialized_submodule() {
    let (library_dir, library) = init_repo();
    commit_files(&library, &[("lib.txt", "lib"), ("src/inner.txt", "inner")]);

    let (temp_dir, repo) = init_repo();
    commit_files(&repo, &[("top.txt", "top")]);
    let commit = add_submodule(&repo, library_dir.path(), "vendor/library");

    let git = Arc::new(GitRepository::open(temp_dir.path()).unwrap());
    let result = ls_tree(git, &hex(commit), &txt_matcher(), &WalkOptions::strict()).unwrap();

    assert_eq!(
        walked_paths(&result),
        vec!["top.txt", "vendor/library/lib.txt", "vendor/library/src/inner.txt"]
    );
    assert_eq!(result.submodule_results().len(), 1);
    assert_eq!(
        result.submodule_results()[0].repository_full_path(),
        "vendor/library"
    );
    assert_eq!(
        result.entry_content("vendor/library/src/inner.txt").unwrap(),
        b"inner"
    );
}

/// A submodule matched as a whole is one entry carrying the gitlink
#[test]
fn test_whole_submodule_entry() {
    let (library_dir, library) = init_repo();
    let library_commit = commit_files(&library, &[("lib.txt", "lib")]);

    let (temp_dir, repo) = init_repo();
    commit_files(&repo, &[("top.txt", "top")]);
    let commit = add_submodule(&repo, library_dir.path(), "vendor/library");

    let git = Arc::new(GitRepository::open(temp_dir.path()).unwrap());
    let result = ls_tree(
        git,
        &hex(commit),
        &SimplePathMatcher::with_base("vendor"),
        &WalkOptions::default(),
    )
    .unwrap();

    assert_eq!(result.entries().len(), 1);
    assert_eq!(result.entries()[0].full_path, "vendor");
    assert_eq!(result.entries()[0].mode, EntryMode::Directory);

    let result = ls_tree(
        Arc::new(GitRepository::open(temp_dir.path()).unwrap()),
        &hex(commit),
        &SimplePathMatcher::with_base("vendor/library"),
        &WalkOptions::default(),
    )
    .unwrap();
    assert_eq!(result.entries().len(), 1);
    assert_eq!(result.entries()[0].mode, EntryMode::Submodule);
    assert_eq!(result.entries()[0].id.to_hex(), hex(library_commit));
}

/// Removing a submodule checkout makes it unresolved: recorded in tolerant
/// mode, an error in strict mode
#[test]
fn test_uninitialized_submodule() {
    let (library_dir, library) = init_repo();
    commit_files(&library, &[("lib.txt", "lib")]);

    let (temp_dir, repo) = init_repo();
    commit_files(&repo, &[("top.txt", "top")]);
    let commit = add_submodule(&repo, library_dir.path(), "vendor/library");

    let resolved = ls_tree(
        Arc::new(GitRepository::open(temp_dir.path()).unwrap()),
        &hex(commit),
        &txt_matcher(),
        &WalkOptions::default(),
    )
    .unwrap();

    fs::remove_dir_all(temp_dir.path().join("vendor/library")).unwrap();

    let tolerant = ls_tree(
        Arc::new(GitRepository::open(temp_dir.path()).unwrap()),
        &hex(commit),
        &txt_matcher(),
        &WalkOptions::default(),
    )
    .unwrap();
    assert_eq!(walked_paths(&tolerant), vec!["top.txt"]);
    assert_eq!(
        tolerant.uninitialized_submodule_paths(),
        &["vendor/library".to_string()]
    );
    assert_ne!(tolerant.checksum(), resolved.checksum());

    let strict = ls_tree(
        Arc::new(GitRepository::open(temp_dir.path()).unwrap()),
        &hex(commit),
        &txt_matcher(),
        &WalkOptions::strict(),
    );
    match strict {
        Err(LsTreeError::UnresolvedSubmodule { path }) => assert_eq!(path, "vendor/library"),
        other => panic!("expected unresolved submodule error, got {:?}", other.map(|r| r.checksum())),
    }

    // Matchers that cannot reach the submodule do not care about it.
    let unrelated = ls_tree(
        Arc::new(GitRepository::open(temp_dir.path()).unwrap()),
        &hex(commit),
        &SimplePathMatcher::with_base("top.txt"),
        &WalkOptions::strict(),
    )
    .unwrap();
    assert_eq!(walked_paths(&unrelated), vec!["top.txt"]);
    assert!(unrelated.uninitialized_submodule_paths().is_empty());
}
