//! The archive-container collaborator interface.
//!
//! The orchestration core never touches ZIP bytes. Everything
//! format-shaped (central directory parsing, DEFLATE, CRC32 over the
//! wire, raw byte transfer) sits behind the two traits here, implemented
//! for the real engine in [`backend`](crate::backend) and for fault
//! injection by the test fakes. The orchestrators are generic over these
//! traits, which is what lets the disk-full, checksum-mismatch, and
//! cancellation paths be driven deterministically in tests.

use std::path::Path;

use crate::entry::Entry;
use crate::error::Result;
use crate::progress::ProgressNode;

/// How appended entries are stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression; bytes are stored as-is.
    #[default]
    Stored,
    /// DEFLATE compression.
    Deflated,
}

/// An open container session for reading.
///
/// Entries are enumerated once at open and are immutable for the session's
/// lifetime; [`extract`](Self::extract) addresses them by their position in
/// that enumeration.
pub trait ArchiveReader {
    /// The enumerated entries, in container order.
    fn entries(&self) -> &[Entry];

    /// Work units this entry contributes to a progress total.
    ///
    /// Entries with no byte content (directories, empty files) still count
    /// one unit so they register as work.
    fn estimate(&self, entry: &Entry) -> u64 {
        entry.size.max(1)
    }

    /// Extracts the entry at `index` to `destination`.
    ///
    /// Writes the file bytes (or creates the directory, or materializes
    /// the symlink) at exactly `destination`, advancing `progress` and
    /// honoring its cancellation flag at buffer-chunk granularity. Returns
    /// the CRC-32 computed over the transferred content, or zero when
    /// `skip_checksum` is set and the computation was skipped. Destination
    /// write failures from a full disk surface as
    /// [`DiskExhausted`](crate::Error::DiskExhausted).
    fn extract(
        &mut self,
        index: usize,
        destination: &Path,
        skip_checksum: bool,
        progress: &mut ProgressNode,
    ) -> Result<u32>;
}

/// An open container session for writing.
pub trait ArchiveWriter {
    /// Work units appending `source` will contribute to a progress total.
    fn estimate(&self, source: &Path) -> Result<u64>;

    /// Appends one filesystem item to the container.
    ///
    /// The entry name is `source` relative to `base`, with `/` separators.
    /// Directories append as directory entries, symlinks as symlink
    /// entries holding the target text, files as byte content transferred
    /// through `progress` with cancellation checked per chunk.
    fn append(
        &mut self,
        source: &Path,
        base: &Path,
        compression: Compression,
        progress: &mut ProgressNode,
    ) -> Result<()>;

    /// Writes the container's closing records and flushes it.
    fn finish(&mut self) -> Result<()>;
}
