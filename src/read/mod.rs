//! Archive extraction.
//!
//! [`unzip`] extracts a whole archive into a destination directory,
//! adapting its layout to the archive's shape: a single entry lands
//! directly in the destination, an archive wrapped in one top-level folder
//! keeps that folder as its own top level, and loose entries are gathered
//! under a fresh directory named after the archive. Existing files are
//! never overwritten; colliding names are renamed with a numeric suffix.
//!
//! # Example
//!
//! ```rust,ignore
//! use zipnest::{UnzipOptions, unzip};
//!
//! unzip("bundle.zip", "/tmp/out", &UnzipOptions::new())?;
//! ```

mod destination;
mod extraction;

use std::path::Path;

use crate::backend::ZipReader;
use crate::encoding::NameDecoding;
use crate::error::{Error, Result};
use crate::progress::ProgressTree;

pub(crate) use extraction::extract_with;

/// Options for [`unzip`].
#[derive(Debug, Clone, Default)]
pub struct UnzipOptions {
    pub(crate) skip_checksum: bool,
    pub(crate) decoding: NameDecoding,
    pub(crate) progress: Option<ProgressTree>,
}

impl UnzipOptions {
    /// Default options: checksums verified, container-default name
    /// decoding, no progress reporting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips CRC-32 verification of extracted content.
    ///
    /// Corrupt entries are then written out without complaint; only
    /// useful when the archive is trusted and speed matters.
    pub fn skip_checksum(mut self, skip: bool) -> Self {
        self.skip_checksum = skip;
        self
    }

    /// How entry names without the UTF-8 flag are decoded.
    pub fn decoding(mut self, decoding: NameDecoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Attaches a progress tree for observation and cancellation.
    ///
    /// Keep a clone; poll [`fraction`](ProgressTree::fraction) or call
    /// [`cancel`](ProgressTree::cancel) from another thread.
    pub fn progress(mut self, progress: ProgressTree) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Extracts the archive at `source` into the directory `destination`.
///
/// The destination directory is created if absent. Entry names are
/// validated against the destination before any bytes are written; a
/// traversal attempt aborts the whole operation with
/// [`PathTraversal`](Error::PathTraversal). If the disk fills up
/// mid-extraction, every path the call created is removed before
/// [`DiskExhausted`](Error::DiskExhausted) is returned.
pub fn unzip(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &UnzipOptions,
) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    if !source.exists() {
        return Err(Error::NotFound {
            path: source.to_path_buf(),
        });
    }

    log::info!(
        "extracting '{}' to '{}'",
        source.display(),
        destination.display()
    );
    let mut reader = ZipReader::open(source, options.decoding)?;
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    extract_with(&mut reader, &stem, destination, options)
}
