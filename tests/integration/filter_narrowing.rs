//! Integration tests for narrowing selections with filter

use crate::integration::test_utils::{hierarchy, walked_paths};
use lstree::tree::{SimplePathMatcher, TruePathMatcher};
use lstree::{ls_tree, WalkOptions};

fn sources_matcher() -> SimplePathMatcher {
    SimplePathMatcher::new("", ["**/*.rs", "**/*.c"], Vec::<&str>::new()).unwrap()
}

/// Filtering a whole-root selection matches walking with the narrower matcher
#[test]
fn test_filter_of_whole_root_matches_direct_walk() {
    let h = hierarchy();
    let options = WalkOptions::default();

    let everything = ls_tree(h.handle(), &h.commit, &TruePathMatcher, &options).unwrap();
    let filtered = everything.filter(&sources_matcher(), &options).unwrap();
    let direct = ls_tree(h.handle(), &h.commit, &sources_matcher(), &options).unwrap();

    assert_eq!(walked_paths(&filtered), walked_paths(&direct));
    assert_eq!(
        filtered.uninitialized_submodule_paths(),
        direct.uninitialized_submodule_paths()
    );
    assert_eq!(filtered.checksum(), direct.checksum());
}

/// Submodules already held are filtered in place, never reopened
#[test]
fn test_filter_does_not_reopen_submodules() {
    let h = hierarchy();
    let options = WalkOptions::default();
    let sources = ls_tree(h.handle(), &h.commit, &sources_matcher(), &options).unwrap();

    let root_opens = h.root.submodule_open_count();
    let core_opens = h.core.submodule_open_count();

    let c_only = SimplePathMatcher::new("", ["**/*.c"], Vec::<&str>::new()).unwrap();
    let filtered = sources.filter(&c_only, &options).unwrap();

    assert_eq!(
        walked_paths(&filtered),
        vec!["deps/core/third_party/zlib/zlib.c"]
    );
    assert_eq!(h.root.submodule_open_count(), root_opens);
    assert_eq!(h.core.submodule_open_count(), core_opens);
}

/// A filter cannot bring back entries the original walk did not select
#[test]
fn test_filter_cannot_recover_entries() {
    let h = hierarchy();
    let options = WalkOptions::default();
    let src = ls_tree(
        h.handle(),
        &h.commit,
        &SimplePathMatcher::with_base("src"),
        &options,
    )
    .unwrap();

    let widened = src.filter(&TruePathMatcher, &options).unwrap();
    assert_eq!(walked_paths(&widened), vec!["src"]);
    assert!(widened.entry("README.md").is_sentinel());
    assert_eq!(widened.checksum(), src.checksum());
}

/// Whole-directory entries are descended into when the filter needs children
#[test]
fn test_filter_descends_whole_directory() {
    let h = hierarchy();
    let options = WalkOptions::default();
    let src = ls_tree(
        h.handle(),
        &h.commit,
        &SimplePathMatcher::with_base("src"),
        &options,
    )
    .unwrap();
    let reads_before = h.root.tree_read_count();

    let main_only = SimplePathMatcher::new("", ["src/main.rs"], Vec::<&str>::new()).unwrap();
    let filtered = src.filter(&main_only, &options).unwrap();

    assert_eq!(walked_paths(&filtered), vec!["src/main.rs"]);
    assert!(h.root.tree_read_count() > reads_before);
    assert_eq!(filtered.entry_content("src/main.rs").unwrap(), b"fn main() {}");
}

/// The filtered-from result is left untouched
#[test]
fn test_original_unchanged_after_filter() {
    let h = hierarchy();
    let options = WalkOptions::default();
    let sources = ls_tree(h.handle(), &h.commit, &sources_matcher(), &options).unwrap();
    let paths_before = walked_paths(&sources);
    let checksum_before = sources.checksum();

    let nothing = sources
        .filter(&SimplePathMatcher::with_base("nowhere"), &options)
        .unwrap();
    assert!(nothing.is_empty());
    assert_eq!(nothing.checksum(), "");

    assert_eq!(walked_paths(&sources), paths_before);
    assert_eq!(sources.checksum(), checksum_before);
}
