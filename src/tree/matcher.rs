//! Path selection predicates
//!
//! A [`PathMatcher`] decides which entries of a tree take part in a
//! selection. Directories and submodule mount points are classified as a
//! whole (fully matched, needs descent, or pruned); files are matched one
//! by one. All paths are full paths from the traversal root using `/`.

use crate::error::LsTreeError;
use crate::tree::path;
use glob::{MatchOptions, Pattern};

/// Selection predicate consumed by the tree walker
pub trait PathMatcher: Send + Sync {
    /// Classify a directory or submodule mount path.
    ///
    /// Returns `(is_matched, should_walk_through)`: whether the entire subtree
    /// is selected as one unit, and whether its children still need to be
    /// inspected. Both `false` prunes the subtree.
    fn process_dir_or_submodule_path(&self, path: &str) -> (bool, bool);

    /// Whether a non-container path is selected.
    fn match_path(&self, path: &str) -> bool;

    /// A single concrete path this matcher is rooted at, or `""`.
    fn base_filepath(&self) -> &str {
        ""
    }

    /// Human-readable summary for logs.
    fn describe(&self) -> String;
}

/// Outcome of classifying a directory or submodule path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirDecision {
    /// The whole subtree is selected as one entry.
    Added,
    /// Children must be inspected.
    Checking,
    /// Nothing below is selected.
    Skipped,
}

impl DirDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirDecision::Added => "added",
            DirDecision::Checking => "checking",
            DirDecision::Skipped => "skipped",
        }
    }

    /// Whether the path is relevant at all (selected or partially selected).
    pub fn is_relevant(&self) -> bool {
        !matches!(self, DirDecision::Skipped)
    }
}

/// Classify a container path; a full match wins over descent.
pub fn classify_dir(matcher: &dyn PathMatcher, full_path: &str) -> DirDecision {
    match matcher.process_dir_or_submodule_path(full_path) {
        (true, _) => DirDecision::Added,
        (false, true) => DirDecision::Checking,
        (false, false) => DirDecision::Skipped,
    }
}

/// Selects everything; the root is reported as fully matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruePathMatcher;

impl PathMatcher for TruePathMatcher {
    fn process_dir_or_submodule_path(&self, _path: &str) -> (bool, bool) {
        (true, false)
    }

    fn match_path(&self, _path: &str) -> bool {
        true
    }

    fn describe(&self) -> String {
        "true".to_string()
    }
}

/// Selects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FalsePathMatcher;

impl PathMatcher for FalsePathMatcher {
    fn process_dir_or_submodule_path(&self, _path: &str) -> (bool, bool) {
        (false, false)
    }

    fn match_path(&self, _path: &str) -> bool {
        false
    }

    fn describe(&self) -> String {
        "false".to_string()
    }
}

#[derive(Debug, Clone)]
struct CompiledGlob {
    raw: String,
    whole: Pattern,
    segments: Vec<Option<Pattern>>,
}

impl CompiledGlob {
    fn new(raw: &str) -> Result<Self, LsTreeError> {
        let normalized = path::normalize(raw);
        let invalid = |e: glob::PatternError| {
            LsTreeError::InvalidArgument(format!("invalid glob {:?}: {}", raw, e))
        };

        let whole = Pattern::new(&normalized).map_err(invalid)?;
        let mut segments = Vec::new();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            if segment == "**" {
                segments.push(None);
            } else {
                segments.push(Some(Pattern::new(segment).map_err(invalid)?));
            }
        }

        Ok(Self {
            raw: normalized,
            whole,
            segments,
        })
    }

    /// The glob matches `rel` or one of its ancestor directories.
    fn matches_path_or_ancestor(&self, rel: &str) -> bool {
        if rel.is_empty() {
            return false;
        }

        let components: Vec<&str> = rel.split('/').collect();
        (1..=components.len()).any(|len| {
            self.whole
                .matches_with(&components[..len].join("/"), match_options())
        })
    }

    /// The glob could match some path strictly inside directory `rel_dir`.
    fn could_match_inside(&self, rel_dir: &str) -> bool {
        let components: Vec<&str> = rel_dir.split('/').filter(|s| !s.is_empty()).collect();
        for (idx, component) in components.iter().enumerate() {
            match self.segments.get(idx) {
                None => return false,
                Some(None) => return true,
                Some(Some(pattern)) => {
                    if !pattern.matches_with(component, match_options()) {
                        return false;
                    }
                }
            }
        }

        self.segments.len() > components.len()
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Base path plus include/exclude globs relative to it
///
/// A path is selected when it lies under the base path, is matched by an
/// include glob (or there are none), and is not matched by an exclude glob.
/// A glob that matches a directory selects everything below it.
#[derive(Debug, Clone)]
pub struct SimplePathMatcher {
    base_path: String,
    include_globs: Vec<CompiledGlob>,
    exclude_globs: Vec<CompiledGlob>,
}

impl SimplePathMatcher {
    pub fn new<I, E>(base_path: &str, include_globs: I, exclude_globs: E) -> Result<Self, LsTreeError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let include_globs = include_globs
            .into_iter()
            .map(|g| CompiledGlob::new(g.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_globs = exclude_globs
            .into_iter()
            .map(|g| CompiledGlob::new(g.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base_path: path::normalize(base_path),
            include_globs,
            exclude_globs,
        })
    }

    /// Matcher selecting exactly the subtree at `base_path`.
    pub fn with_base(base_path: &str) -> Self {
        Self {
            base_path: path::normalize(base_path),
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
        }
    }

    fn rel_path<'a>(&self, full_path: &'a str) -> Option<&'a str> {
        if full_path == self.base_path {
            Some("")
        } else {
            path::relative_to(&self.base_path, full_path)
        }
    }

    fn is_included(&self, rel: &str) -> bool {
        self.include_globs.is_empty()
            || self
                .include_globs
                .iter()
                .any(|g| g.matches_path_or_ancestor(rel))
    }

    fn is_excluded(&self, rel: &str) -> bool {
        self.exclude_globs
            .iter()
            .any(|g| g.matches_path_or_ancestor(rel))
    }
}

impl PathMatcher for SimplePathMatcher {
    fn process_dir_or_submodule_path(&self, full_path: &str) -> (bool, bool) {
        // Strict ancestors of the base path must be descended to reach it.
        if path::relative_to(full_path, &self.base_path).is_some() {
            return (false, true);
        }

        let rel = match self.rel_path(full_path) {
            Some(rel) => rel,
            None => return (false, false),
        };

        if self.is_excluded(rel) {
            return (false, false);
        }

        let exclude_inside = self
            .exclude_globs
            .iter()
            .any(|g| g.could_match_inside(rel));

        if self.is_included(rel) {
            return if exclude_inside {
                (false, true)
            } else {
                (true, false)
            };
        }

        let include_inside = self
            .include_globs
            .iter()
            .any(|g| g.could_match_inside(rel));
        (false, include_inside)
    }

    fn match_path(&self, full_path: &str) -> bool {
        match self.rel_path(full_path) {
            Some(rel) => self.is_included(rel) && !self.is_excluded(rel),
            None => false,
        }
    }

    fn base_filepath(&self) -> &str {
        &self.base_path
    }

    fn describe(&self) -> String {
        let includes: Vec<&str> = self.include_globs.iter().map(|g| g.raw.as_str()).collect();
        let excludes: Vec<&str> = self.exclude_globs.iter().map(|g| g.raw.as_str()).collect();
        format!(
            "path:{} include:[{}] exclude:[{}]",
            path::display(&self.base_path),
            includes.join(", "),
            excludes.join(", ")
        )
    }
}
