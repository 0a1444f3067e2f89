//! Checksum computation for selections using BLAKE3

use crate::tree::path;
use crate::tree::result::LsTreeResult;
use blake3::Hasher;
use tracing::{debug, debug_span};

/// Token hashed for a relevant submodule that could not be resolved.
pub fn unresolved_submodule_marker(submodule_path: &str) -> String {
    format!("-{}", submodule_path)
}

/// Compute the checksum of a selection
///
/// checksum = hash(entry ids by path || unresolved markers by path || child checksums by mount path)
///
/// An empty selection yields an empty string so callers can tell "nothing
/// selected" apart from any real digest. Ids are hashed in their hex form.
pub fn compute_checksum(result: &LsTreeResult) -> String {
    if result.is_empty() {
        return String::new();
    }

    let mut hasher = Hasher::new();

    // Entries, already sorted by full path
    for entry in result.entries() {
        hasher.update(entry.id.to_hex().as_bytes());
        debug!(
            path = path::display(&entry.full_path),
            mode = entry.mode.as_str(),
            id = %entry.id,
            "Entry added to checksum"
        );
    }

    // Unresolved submodules, already sorted
    for submodule_path in result.uninitialized_submodule_paths() {
        hasher.update(unresolved_submodule_marker(submodule_path).as_bytes());
        debug!(path = %submodule_path, "Unresolved submodule added to checksum");
    }

    // Nested results, already sorted by mount path
    for submodule_result in result.submodule_results() {
        let span = debug_span!("submodule", path = submodule_result.repository_full_path());
        let _guard = span.enter();

        let child = compute_checksum(submodule_result);
        if child.is_empty() {
            continue;
        }
        hasher.update(child.as_bytes());
        debug!(checksum = %child, "Submodule checksum added");
    }

    let checksum = hasher.finalize().to_hex().to_string();
    debug!(
        scope = path::display(result.repository_full_path()),
        checksum = %checksum,
        "Checksum computed"
    );
    checksum
}
