//! Housekeeping-entry filtering.
//!
//! Archivers on macOS record resource forks and Finder state alongside the
//! real payload. Those bookkeeping entries must never influence shape
//! classification and must never be extracted, so the orchestrator filters
//! them out of the enumeration before anything else looks at it.

use crate::entry::Entry;

/// Metadata folder conventionally written next to the real entries.
pub const METADATA_FOLDER_MARKER: &str = "__MACOSX";

/// Per-directory hidden bookkeeping file.
pub const HIDDEN_MARKER_FILE: &str = ".DS_Store";

/// Returns `true` if a decoded entry path names archive housekeeping
/// rather than payload.
///
/// Matches anywhere in the path, so both a top-level `__MACOSX/` tree and
/// a `.DS_Store` nested deep inside a wrapped folder are caught.
pub fn is_housekeeping(name: &str) -> bool {
    name.contains(METADATA_FOLDER_MARKER) || name.contains(HIDDEN_MARKER_FILE)
}

/// Produces the subsequence of entries that are real payload.
///
/// Pure and order-preserving: the result borrows from the input slice and
/// keeps the container's enumeration order, which later stages (shape
/// classification, the extraction loop) rely on.
pub fn strip_housekeeping(entries: &[Entry]) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| !is_housekeeping(&entry.name))
        .collect()
}
