//! Filesystem name-collision resolution.
//!
//! When a resolved destination is already occupied, extraction never
//! overwrites and never fails; it renames. The replacement keeps the
//! extension and slots a counter in front of it, the way desktop
//! unarchivers do: `report.pdf` becomes `report 2.pdf`, then
//! `report 3.pdf`, until a free name turns up.

use std::path::{Path, PathBuf};

/// The archive extension that never splits off during renaming.
///
/// A name ending in `.zip` counts as having no extension here, so the
/// counter lands after the full name (`bundle.zip 2`, not
/// `bundle 2.zip`). Matched case-insensitively.
const RESERVED_ARCHIVE_EXTENSION: &str = "zip";

/// Returns `path` untouched if nothing occupies it, otherwise the first
/// counter-suffixed sibling (`" 2"`, `" 3"`, …) that does not exist.
///
/// Occupancy is probed with a non-traversing stat, so a dangling symlink
/// still counts as occupied and never gets clobbered. The probe races with
/// external writers by design; the caller holds the single-writer
/// assumption for the destination tree.
pub fn resolve_available(path: &Path) -> PathBuf {
    if !occupied(path) {
        return path.to_path_buf();
    }

    let (stem, extension) = split_for_renaming(path);
    let mut counter: u64 = 2;
    loop {
        let file_name = match extension {
            Some(ref ext) => format!("{stem} {counter}.{ext}"),
            None => format!("{stem} {counter}"),
        };
        let candidate = path.with_file_name(file_name);
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Splits a file name into the part the counter attaches to and the
/// extension to re-append, honoring the reserved archive extension.
fn split_for_renaming(path: &Path) -> (String, Option<String>) {
    let full = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.to_string_lossy().eq_ignore_ascii_case(RESERVED_ARCHIVE_EXTENSION) => (
            stem.to_string_lossy().into_owned(),
            Some(ext.to_string_lossy().into_owned()),
        ),
        _ => (full, None),
    }
}
