//! Canonical path handling for tree entries
//!
//! Every full path inside a selection uses `/` as separator, has no leading
//! `./`, no trailing separator, and the traversal root is the empty string.
//! Platform paths are converted at the boundary and never reach the walker.

/// Convert platform separators to `/`.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a path string for comparisons and lookups
///
/// This function:
/// 1. Converts separators to `/`
/// 2. Drops empty and `.` components (so `./a//b/` becomes `a/b`)
/// 3. Maps `.` and the empty string to the root (`""`)
pub fn normalize(path: &str) -> String {
    let slashed = to_slash(path);
    slashed
        .split('/')
        .filter(|component| !component.is_empty() && *component != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a child name onto a parent path. The root is the empty string.
pub fn join(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}/{}", parent, child),
    }
}

/// Path of `full` relative to `base`, if `full` lies strictly inside `base`.
///
/// Returns `None` when `full` equals `base` or lies outside of it.
pub fn relative_to<'a>(base: &str, full: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return if full.is_empty() { None } else { Some(full) };
    }

    let rest = full.strip_prefix(base)?;
    let rest = rest.strip_prefix('/')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Relative path used when rebasing across a repository or tree boundary.
///
/// A caller-supplied pair that does not nest is an internal invariant break.
pub fn rebase<'a>(base: &str, full: &'a str) -> &'a str {
    match relative_to(base, full) {
        Some(rel) => rel,
        None => panic!("unexpected paths: {:?} is not inside {:?}", full, base),
    }
}

/// Render a full path for humans; the root shows as `.`.
pub fn display(path: &str) -> &str {
    if path.is_empty() {
        "."
    } else {
        path
    }
}
