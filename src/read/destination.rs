//! Destination planning and the rollback ledger.
//!
//! Before any bytes move, the orchestrator turns the archive's shape into
//! one absolute candidate path per filtered entry. The shape decides the
//! top level: a singleton lands directly in the destination
//! (conflict-renamed if occupied), a wrapped archive has its wrapper
//! folder renamed once and folded into every path, and a flat archive gets
//! one fresh subdirectory named after the archive to keep loose entries
//! from spraying across the destination.
//!
//! Every path this module (or the extraction loop) newly creates is
//! recorded in the [`Ledger`]. If the disk fills mid-extraction the ledger
//! is replayed newest-first to delete everything the attempt made, so a
//! failed extraction leaves no debris.

use std::fs;
use std::path::{Path, PathBuf};

use crate::conflict::resolve_available;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::shape::ArchiveShape;

/// The rollback ledger: every path newly created by one extraction.
///
/// Grows only; consumed by [`rollback`](Self::rollback) on
/// disk-exhaustion. Owned by a single in-flight extraction, never shared.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    created: Vec<PathBuf>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a path about to be (or just) created.
    pub(crate) fn record(&mut self, path: PathBuf) {
        self.created.push(path);
    }

    /// Deletes every recorded path, newest first.
    ///
    /// Newest-first removes files before the directories that hold them,
    /// so plain `remove_file`/`remove_dir` suffice. Best-effort: cleanup
    /// failures are logged and never override the error that triggered
    /// the rollback. A path that was recorded but never materialized (the
    /// write failed before creating it) is silently skipped.
    pub(crate) fn rollback(self) {
        for path in self.created.into_iter().rev() {
            let result = match path.symlink_metadata() {
                Ok(meta) if meta.is_dir() => fs::remove_dir(&path),
                Ok(_) => fs::remove_file(&path),
                Err(_) => continue,
            };
            if let Err(e) = result {
                log::warn!(
                    "Failed to remove '{}' during rollback: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn paths(&self) -> &[PathBuf] {
        &self.created
    }
}

/// Creates `path` and any missing ancestors, recording each newly created
/// directory in the ledger.
///
/// Unlike `create_dir_all`, this records exactly the directories that did
/// not exist before, which is what rollback needs to undo.
pub(crate) fn ensure_dir(path: &Path, ledger: &mut Ledger) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        ensure_dir(parent, ledger)?;
    }
    match fs::create_dir(path) {
        Ok(()) => {
            ledger.record(path.to_path_buf());
            Ok(())
        }
        // Lost a race against our own recursion base case; fine either way
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::from_destination_io(e)),
    }
}

/// Resolves one absolute candidate path per filtered entry.
///
/// `entries` must be non-empty and in filtered enumeration order;
/// `archive_stem` names the flat-shape subdirectory. For the flat shape
/// the subdirectory is created here (and recorded); the other shapes
/// create nothing yet.
pub(crate) fn plan_destinations(
    shape: &ArchiveShape,
    entries: &[Entry],
    root: &Path,
    archive_stem: &str,
    ledger: &mut Ledger,
) -> Result<Vec<PathBuf>> {
    match shape {
        ArchiveShape::Singleton => {
            // Conflict-resolve the natural destination as a whole; the
            // counter slots before the extension.
            Ok(vec![resolve_available(&root.join(&entries[0].name))])
        }
        ArchiveShape::Wrapped { folder } => {
            // Rename the wrapper once, up front, then fold the resolved
            // name into every entry by swapping its first segment. The
            // wrapper directory itself materializes when its entry (or the
            // first child's parent) is created.
            let resolved = resolve_available(&root.join(folder));
            let wrapper = resolved
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| folder.clone());
            Ok(entries
                .iter()
                .map(|entry| {
                    let mut path = root.join(&wrapper);
                    for segment in entry
                        .name
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .skip(1)
                    {
                        path.push(segment);
                    }
                    path
                })
                .collect())
        }
        ArchiveShape::Flat => {
            let subdir = resolve_available(&root.join(archive_stem));
            ensure_dir(&subdir, ledger)?;
            Ok(entries.iter().map(|entry| subdir.join(&entry.name)).collect())
        }
    }
}
