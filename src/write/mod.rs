//! Archive creation.
//!
//! [`zip`] packs a file or directory tree into a new archive. The
//! destination must not exist; creation never overwrites. By default a
//! directory source is wrapped in one top-level folder carrying its own
//! name, so extracting the result reproduces the tree the user pointed
//! at rather than spraying its contents.
//!
//! # Example
//!
//! ```rust,ignore
//! use zipnest::{ZipOptions, zip};
//!
//! zip("notes", "notes.zip", &ZipOptions::new())?;
//! ```

use std::path::{Path, PathBuf};

use crate::backend::ZipWriter;
use crate::container::{ArchiveWriter, Compression};
use crate::error::{Error, Result};
use crate::progress::ProgressTree;

/// Options for [`zip`].
#[derive(Debug, Clone)]
pub struct ZipOptions {
    pub(crate) keep_parent_dir: bool,
    pub(crate) compression: Compression,
    pub(crate) progress: Option<ProgressTree>,
}

impl Default for ZipOptions {
    fn default() -> Self {
        Self {
            keep_parent_dir: true,
            compression: Compression::default(),
            progress: None,
        }
    }
}

impl ZipOptions {
    /// Default options: parent directory kept, entries stored
    /// uncompressed, no progress reporting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a directory source is wrapped in a folder named after it.
    ///
    /// On by default. With `false`, the directory's contents become the
    /// archive's top level and extracting the result yields a flat
    /// archive.
    pub fn keep_parent_dir(mut self, keep: bool) -> Self {
        self.keep_parent_dir = keep;
        self
    }

    /// How file content is stored in the archive.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Attaches a progress tree for observation and cancellation.
    pub fn progress(mut self, progress: ProgressTree) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Packs `source` (a file, directory, or symlink) into a new archive at
/// `destination`.
///
/// Symlinks inside the tree are stored as symlink entries holding their
/// target text; they are never followed. On any failure the partially
/// written archive is removed, so `destination` either holds a complete
/// archive or nothing.
pub fn zip(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ZipOptions,
) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    if source.symlink_metadata().is_err() {
        return Err(Error::NotFound {
            path: source.to_path_buf(),
        });
    }
    if destination.symlink_metadata().is_ok() {
        return Err(Error::AlreadyExists {
            path: destination.to_path_buf(),
        });
    }

    log::info!(
        "archiving '{}' to '{}'",
        source.display(),
        destination.display()
    );
    let mut writer = ZipWriter::create(destination)?;
    let result = archive_with(&mut writer, source, options);
    if result.is_err() {
        drop(writer);
        // The destination did not exist before this call, so the partial
        // file is ours to discard.
        if let Err(e) = std::fs::remove_file(destination) {
            log::warn!(
                "Failed to remove partial archive '{}': {}",
                destination.display(),
                e
            );
        }
    }
    result
}

/// Walks `source` and appends every item to the open container.
///
/// Items are appended depth-first with siblings in name order, so the
/// same tree always produces the same entry sequence.
pub(crate) fn archive_with<W: ArchiveWriter>(
    writer: &mut W,
    source: &Path,
    options: &ZipOptions,
) -> Result<()> {
    let meta = source.symlink_metadata()?;

    let (base, items) = if meta.is_dir() {
        let base = parent_of(source);
        let mut items = Vec::new();
        for item in walkdir::WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
        {
            let item = item.map_err(|e| Error::Io(e.into()))?;
            // Without the wrapper the tree's own root has no entry name
            if !options.keep_parent_dir && item.depth() == 0 {
                continue;
            }
            items.push(item.into_path());
        }
        let base = if options.keep_parent_dir {
            base
        } else {
            source.to_path_buf()
        };
        (base, items)
    } else {
        (parent_of(source), vec![source.to_path_buf()])
    };

    let progress = options.progress.clone().unwrap_or_default();
    let mut total = 0;
    for item in &items {
        total += writer.estimate(item)?;
    }
    progress.set_total(total);

    for item in &items {
        if progress.is_cancelled() {
            return Err(Error::Cancelled);
        }
        log::debug!("appending '{}'", item.display());
        let mut child = progress.child(writer.estimate(item)?);
        writer.append(item, &base, options.compression, &mut child)?;
        child.complete();
    }
    writer.finish()
}

fn parent_of(source: &Path) -> PathBuf {
    source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new)
}
