//! The per-entry extraction loop.
//!
//! One [`Extraction`] drives a whole unzip call through its states:
//! classify the filtered entries, plan destinations for the shape, then
//! for each entry in enumeration order resolve and validate its path,
//! transfer bytes through the container, verify the checksum, and restore
//! attributes. Exactly one entry is in flight at any time.
//!
//! Failure handling is deliberately asymmetric: a full disk unwinds every
//! path the attempt created (the ledger), while a checksum mismatch or
//! traversal rejection halts the loop and leaves prior work on disk for
//! inspection.

use std::path::Path;

use crate::attrs::restore_attributes;
use crate::container::ArchiveReader;
use crate::entry::{Entry, EntryKind};
use crate::error::{Error, Result};
use crate::filter::strip_housekeeping;
use crate::progress::ProgressTree;
use crate::safety::{normalize_lexically, validate_destination};
use crate::shape::{ArchiveShape, classify};

use super::UnzipOptions;
use super::destination::{Ledger, ensure_dir, plan_destinations};

/// Extracts every filtered entry of an open container to `destination`.
///
/// `archive_stem` names the subdirectory created for flat archives. The
/// destination root is created if absent and recorded in the rollback
/// ledger like everything else the call makes.
pub(crate) fn extract_with<R: ArchiveReader>(
    reader: &mut R,
    archive_stem: &str,
    destination: &Path,
    options: &UnzipOptions,
) -> Result<()> {
    let kept: Vec<Entry> = strip_housekeeping(reader.entries())
        .into_iter()
        .cloned()
        .collect();
    if kept.is_empty() {
        log::debug!("nothing to extract after housekeeping filter");
        return Ok(());
    }

    let refs: Vec<&Entry> = kept.iter().collect();
    let shape = classify(&refs);
    log::debug!("archive shape: {shape:?}, {} entries", kept.len());

    let progress = options.progress.clone().unwrap_or_default();
    progress.set_total(kept.iter().map(|e| reader.estimate(e)).sum());

    let root = normalize_lexically(&std::path::absolute(destination)?);

    let mut ledger = Ledger::new();
    let mut extraction = Extraction {
        reader,
        entries: &kept,
        shape: &shape,
        root: &root,
        archive_stem,
        options,
        progress: &progress,
    };
    match extraction.run(&mut ledger) {
        Err(e) if e.triggers_rollback() => {
            log::warn!("destination out of space, removing partial extraction");
            ledger.rollback();
            Err(e)
        }
        other => other,
    }
}

/// One in-flight extraction: the loop state shared across entries.
struct Extraction<'a, R: ArchiveReader> {
    reader: &'a mut R,
    entries: &'a [Entry],
    shape: &'a ArchiveShape,
    root: &'a Path,
    archive_stem: &'a str,
    options: &'a UnzipOptions,
    progress: &'a ProgressTree,
}

impl<R: ArchiveReader> Extraction<'_, R> {
    fn run(&mut self, ledger: &mut Ledger) -> Result<()> {
        ensure_dir(self.root, ledger)?;
        let candidates = plan_destinations(
            self.shape,
            self.entries,
            self.root,
            self.archive_stem,
            ledger,
        )?;

        // Directory attributes are applied after everything else: children
        // still need to be created inside (a stored read-only mode would
        // lock us out), and every child write bumps the directory's mtime.
        let mut deferred_dirs: Vec<(std::path::PathBuf, &Entry)> = Vec::new();

        for (entry, candidate) in self.entries.iter().zip(&candidates) {
            // Cooperative cancellation between entries; the transfer loop
            // checks again per chunk.
            if self.progress.is_cancelled() {
                return Err(Error::Cancelled);
            }

            // Containment must approve before any bytes are written;
            // rejection aborts the whole operation, never a skip.
            let path = validate_destination(self.root, candidate, entry.index, &entry.name)?;
            if let Some(parent) = path.parent() {
                ensure_dir(parent, ledger)?;
            }

            log::debug!("extracting '{}' to '{}'", entry.name, path.display());
            let mut child = self.progress.child(self.reader.estimate(entry));

            match entry.kind {
                EntryKind::Directory => {
                    ensure_dir(&path, ledger)?;
                    deferred_dirs.push((path, entry));
                    child.complete();
                    continue;
                }
                EntryKind::File | EntryKind::Symlink => {
                    // Recorded before the transfer so a half-written file
                    // is still rolled back on disk exhaustion.
                    ledger.record(path.clone());
                    let computed = self.reader.extract(
                        entry.index,
                        &path,
                        self.options.skip_checksum,
                        &mut child,
                    )?;
                    if !self.options.skip_checksum && computed != entry.checksum {
                        return Err(Error::ChecksumMismatch {
                            entry_index: entry.index,
                            entry_name: Some(entry.name.clone()),
                            expected: entry.checksum,
                            actual: computed,
                        });
                    }
                }
            }

            restore_attributes(&path, entry)?;
            child.complete();
        }

        // Deepest directories first, so a restrictive parent mode cannot
        // block the children's restoration.
        for (path, entry) in deferred_dirs.iter().rev() {
            restore_attributes(path, entry)?;
        }
        Ok(())
    }
}
