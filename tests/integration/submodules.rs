//! Integration tests for nested submodule hierarchies

use crate::integration::test_utils::{hierarchy, walked_paths};
use lstree::tree::{MemoryNode, MemoryRepository, SimplePathMatcher};
use lstree::{ls_tree, EntryMode, LsTreeError, WalkOptions};
use std::sync::Arc;

fn sources_matcher() -> SimplePathMatcher {
    SimplePathMatcher::new("", ["**/*.rs", "**/*.c"], Vec::<&str>::new()).unwrap()
}

/// Entries of nested submodules are rebased onto the top-level repository
#[test]
fn test_nested_submodule_paths_are_rebased() {
    let h = hierarchy();
    let result = ls_tree(h.handle(), &h.commit, &sources_matcher(), &WalkOptions::default())
        .unwrap();

    assert_eq!(
        walked_paths(&result),
        vec![
            "src/lib.rs",
            "src/main.rs",
            "deps/core/core.rs",
            "deps/core/third_party/zlib/zlib.c",
        ]
    );

    let core = &result.submodule_results()[0];
    assert_eq!(core.repository_full_path(), "deps/core");
    assert_eq!(core.submodule_results().len(), 1);
    assert_eq!(
        core.submodule_results()[0].repository_full_path(),
        "deps/core/third_party/zlib"
    );
}

/// Unresolved submodules at any depth are collected on the top-level result
#[test]
fn test_unresolved_paths_collected_on_root() {
    let h = hierarchy();
    let result = ls_tree(h.handle(), &h.commit, &sources_matcher(), &WalkOptions::default())
        .unwrap();

    assert_eq!(
        result.uninitialized_submodule_paths(),
        &[
            "deps/absent".to_string(),
            "deps/core/third_party/missing".to_string()
        ]
    );
    assert!(result.submodule_results()[0]
        .uninitialized_submodule_paths()
        .is_empty());
}

/// Strict mode fails on the first relevant unresolved submodule
#[test]
fn test_strict_mode() {
    let h = hierarchy();
    match ls_tree(h.handle(), &h.commit, &sources_matcher(), &WalkOptions::strict()) {
        Err(LsTreeError::UnresolvedSubmodule { path }) => {
            assert!(path == "deps/absent" || path == "deps/core/third_party/missing");
        }
        other => panic!("expected unresolved submodule, got {:?}", other.map(|r| r.checksum())),
    }

    let result = ls_tree(
        h.handle(),
        &h.commit,
        &SimplePathMatcher::with_base("src"),
        &WalkOptions::strict(),
    )
    .unwrap();
    assert_eq!(walked_paths(&result), vec!["src"]);
}

/// Content is read from the repository that owns the entry
#[test]
fn test_content_through_two_levels() {
    let h = hierarchy();
    let result = ls_tree(h.handle(), &h.commit, &sources_matcher(), &WalkOptions::default())
        .unwrap();

    assert_eq!(
        result
            .entry_content("deps/core/third_party/zlib/zlib.c")
            .unwrap(),
        b"int inflate;"
    );
    assert_eq!(result.entry("deps/core/core.rs").mode, EntryMode::Regular);
    assert!(result.entry("deps/core/docs/guide.md").is_sentinel());
}

/// A base filepath inside a nested submodule is resolved by crossing mounts
#[test]
fn test_base_filepath_through_nested_submodules() {
    let h = hierarchy();
    let matcher = SimplePathMatcher::with_base("deps/core/third_party/zlib/zlib.c");
    let result = ls_tree(h.handle(), &h.commit, &matcher, &WalkOptions::strict()).unwrap();

    assert_eq!(
        walked_paths(&result),
        vec!["deps/core/third_party/zlib/zlib.c"]
    );
    assert!(result.entries().is_empty());
    assert!(result.uninitialized_submodule_paths().is_empty());
}

/// The commit recorded in the walked tree decides the submodule content,
/// not the newest commit of the submodule
#[test]
fn test_gitlink_pins_submodule_commit() {
    let mut library = MemoryRepository::new();
    let pinned = library.commit_paths(&[("v.txt", MemoryNode::file("old"))]);
    let newer = library.commit_paths(&[("v.txt", MemoryNode::file("new"))]);
    let library = Arc::new(library);

    let build = |gitlink| {
        let mut root = MemoryRepository::new();
        let commit = root.commit_paths(&[("lib", MemoryNode::Gitlink(gitlink))]);
        root.declare_submodule("lib", Some(newer), Some(library.clone()));
        (Arc::new(root), commit.to_hex())
    };

    let matcher = SimplePathMatcher::new("", ["**/*.txt"], Vec::<&str>::new()).unwrap();

    let (root, commit) = build(pinned);
    let old = ls_tree(root, &commit, &matcher, &WalkOptions::default()).unwrap();
    assert_eq!(old.entry_content("lib/v.txt").unwrap(), b"old");

    let (root, commit) = build(newer);
    let new = ls_tree(root, &commit, &matcher, &WalkOptions::default()).unwrap();
    assert_eq!(new.entry_content("lib/v.txt").unwrap(), b"new");

    assert_ne!(old.checksum(), new.checksum());
}
