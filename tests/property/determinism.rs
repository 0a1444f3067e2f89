//! Property-based tests for determinism guarantees

use lstree::tree::{MemoryNode, MemoryRepository, SimplePathMatcher, TruePathMatcher};
use lstree::{ls_tree, LsTreeResult, WalkOptions};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Paths over a small alphabet so files and directories collide often.
fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    let component = prop::sample::select(vec!["a", "b", "c"]);
    let leaf = prop::sample::select(vec!["x.txt", "y.md", "z.txt"]);
    let file_path = (prop::collection::vec(component, 0..3), leaf).prop_map(|(dirs, leaf)| {
        let mut parts: Vec<&str> = dirs;
        parts.push(leaf);
        parts.join("/")
    });
    prop::collection::btree_map(file_path, prop::collection::vec(any::<u8>(), 0..8), 1..12)
}

fn build(files: &BTreeMap<String, Vec<u8>>) -> (Arc<MemoryRepository>, String) {
    let mut repo = MemoryRepository::new();
    let nodes: Vec<(&str, MemoryNode)> = files
        .iter()
        .map(|(p, content)| (p.as_str(), MemoryNode::File(content.clone())))
        .collect();
    let commit = repo.commit_paths(&nodes);
    (Arc::new(repo), commit.to_hex())
}

fn walk(files: &BTreeMap<String, Vec<u8>>, matcher: &SimplePathMatcher) -> LsTreeResult {
    let (repo, commit) = build(files);
    ls_tree(repo, &commit, matcher, &WalkOptions::default()).unwrap()
}

fn txt_matcher() -> SimplePathMatcher {
    SimplePathMatcher::new("", ["**/*.txt"], Vec::<&str>::new()).unwrap()
}

proptest! {
    /// Independently built repositories with the same files agree on the checksum
    #[test]
    fn test_checksum_determinism_property(files in file_set()) {
        let first = walk(&files, &txt_matcher());
        let second = walk(&files, &txt_matcher());
        prop_assert_eq!(first.checksum(), second.checksum());
    }

    /// An empty selection is exactly the one with an empty checksum
    #[test]
    fn test_empty_iff_empty_checksum_property(files in file_set(), base in prop::sample::select(vec!["", "a", "b/c", "x.txt"])) {
        let matcher = SimplePathMatcher::new(base, ["**/*.txt"], Vec::<&str>::new()).unwrap();
        let result = walk(&files, &matcher);
        prop_assert_eq!(result.is_empty(), result.checksum().is_empty());

        let selected_txt = files.keys().any(|p| {
            p.ends_with(".txt") && (base.is_empty() || p.starts_with(&format!("{}/", base)))
        });
        prop_assert_eq!(!result.is_empty(), selected_txt);
    }

    /// Filtering with a matcher that accepts everything keeps the checksum
    #[test]
    fn test_filter_with_true_matcher_is_identity(files in file_set()) {
        let (repo, commit) = build(&files);
        let result = ls_tree(repo, &commit, &txt_matcher(), &WalkOptions::default()).unwrap();
        let filtered = result.filter(&TruePathMatcher, &WalkOptions::default()).unwrap();
        prop_assert_eq!(filtered.checksum(), result.checksum());
        prop_assert_eq!(filtered.entries(), result.entries());
    }

    /// Every walked entry is reported with its blob content intact
    #[test]
    fn test_walked_entries_have_content(files in file_set()) {
        let (repo, commit) = build(&files);
        let result = ls_tree(repo, &commit, &txt_matcher(), &WalkOptions::default()).unwrap();
        for entry in result.entries() {
            prop_assert_eq!(&result.entry_content(&entry.full_path).unwrap(), &files[&entry.full_path]);
        }
    }
}
