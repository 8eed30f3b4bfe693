//! Error types for zip orchestration operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when extracting or creating archives, along with a
//! convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. You can
//! handle errors using pattern matching or the `?` operator:
//!
//! ```rust,no_run
//! use zipnest::{unzip, UnzipOptions, Result};
//! use std::path::Path;
//!
//! fn extract(archive: &Path, dest: &Path) -> Result<()> {
//!     unzip(archive, dest, &UnzipOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! For fine-grained handling, match on specific variants:
//!
//! ```rust,no_run
//! use zipnest::{unzip, UnzipOptions, Error};
//! use std::path::Path;
//!
//! fn extract_with_report(archive: &Path, dest: &Path) {
//!     match unzip(archive, dest, &UnzipOptions::default()) {
//!         Ok(()) => {}
//!         Err(Error::PathTraversal { entry_index, path }) => {
//!             eprintln!("unsafe entry {entry_index}: {path}");
//!         }
//!         Err(Error::DiskExhausted { .. }) => {
//!             eprintln!("destination ran out of space; partial output removed");
//!         }
//!         Err(e) => eprintln!("extraction failed: {e}"),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// Which required attribute was absent when restoring entry metadata.
///
/// Symlink attribute restoration needs both the stored permission bits and
/// the stored modification date; when either is missing on a platform that
/// can apply it, restoration fails with
/// [`Error::AttributeRestoreFailed`] carrying this marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MissingAttribute {
    /// The entry carried no usable permission bits.
    Permissions,
    /// The entry carried no usable modification date.
    ModificationDate,
}

impl std::fmt::Display for MissingAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permissions => write!(f, "permission bits"),
            Self::ModificationDate => write!(f, "modification date"),
        }
    }
}

/// Helper struct for formatting ChecksumMismatch error messages.
struct ChecksumMismatchDisplay<'a> {
    entry_index: usize,
    entry_name: Option<&'a str>,
    expected: u32,
    actual: u32,
}

impl std::fmt::Display for ChecksumMismatchDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Checksum mismatch for entry {}", self.entry_index)?;
        if let Some(name) = self.entry_name {
            write!(f, " ({})", name)?;
        }
        write!(f, ": expected {:#x}, got {:#x}", self.expected, self.actual)
    }
}

/// The main error type for archive orchestration.
///
/// This enum represents all possible errors that can occur when extracting
/// or creating archives. Each variant includes relevant context to help
/// diagnose the issue.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Preconditions | [`NotFound`][Self::NotFound], [`AlreadyExists`][Self::AlreadyExists] | Bad call arguments |
/// | Container | [`Unreadable`][Self::Unreadable], [`Unwritable`][Self::Unwritable], [`InvalidFormat`][Self::InvalidFormat] | Open failure, corrupt data |
/// | Security | [`PathTraversal`][Self::PathTraversal] | Malicious entry paths |
/// | Integrity | [`ChecksumMismatch`][Self::ChecksumMismatch] | Data corruption |
/// | Space | [`DiskExhausted`][Self::DiskExhausted] | Destination full |
/// | Metadata | [`AttributeRestoreFailed`][Self::AttributeRestoreFailed] | Missing entry metadata |
/// | Flow | [`Cancelled`][Self::Cancelled] | Cooperative cancellation |
/// | I/O | [`Io`][Self::Io] | Everything else the filesystem reports |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The source path does not exist.
    ///
    /// Returned by both directions before any work starts: `zip` when the
    /// tree to archive is missing, `unzip` when the archive file is missing.
    #[error("Source not found: {path}")]
    NotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// The destination already exists.
    ///
    /// Returned by `zip` when the requested archive path is already
    /// occupied. Creation never overwrites; pick a different destination or
    /// remove the existing file first.
    #[error("Destination already exists: {path}")]
    AlreadyExists {
        /// The occupied destination path.
        path: PathBuf,
    },

    /// The archive container could not be opened for reading.
    ///
    /// The file exists but the engine could not open it (permissions,
    /// not a regular file, unreadable media).
    #[error("Archive not readable: {path}: {source}")]
    Unreadable {
        /// The archive path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The archive container could not be created for writing.
    ///
    /// Disk exhaustion during container creation surfaces as
    /// [`DiskExhausted`][Self::DiskExhausted] instead, so callers can tell
    /// the two conditions apart.
    #[error("Archive not writable: {path}: {source}")]
    Unwritable {
        /// The archive path that failed to open for writing.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Path traversal detected in an archive entry.
    ///
    /// This is a **security error**: the entry's resolved destination lies
    /// outside the extraction root (e.g. `../../etc/passwd`). The whole
    /// extraction aborts before any bytes of the offending entry are
    /// written; it is never downgraded to a per-entry skip.
    #[error("Path traversal detected in entry {entry_index}: {path}")]
    PathTraversal {
        /// The entry index with path traversal.
        entry_index: usize,
        /// The decoded entry path that escapes the destination.
        path: String,
    },

    /// The computed checksum does not match the entry's stored value.
    ///
    /// Fatal for the whole extraction. The mismatched output is left on
    /// disk for inspection; only [`DiskExhausted`][Self::DiskExhausted]
    /// triggers rollback of already-written paths.
    #[error("{}", ChecksumMismatchDisplay { entry_index: *entry_index, entry_name: entry_name.as_deref(), expected: *expected, actual: *actual })]
    ChecksumMismatch {
        /// The entry index with the checksum mismatch.
        entry_index: usize,
        /// The decoded entry path (if known).
        entry_name: Option<String>,
        /// The checksum recorded in the archive.
        expected: u32,
        /// The checksum computed from the transferred bytes.
        actual: u32,
    },

    /// The destination ran out of space.
    ///
    /// Before this error surfaces, every path recorded in the extraction's
    /// rollback ledger is deleted best-effort (cleanup failures are logged,
    /// not escalated), so a failed extraction does not strand partial
    /// output.
    #[error("Destination out of space: {source}")]
    DiskExhausted {
        /// The underlying I/O error reporting the full disk.
        #[source]
        source: io::Error,
    },

    /// Required entry metadata was missing during attribute restoration.
    ///
    /// Symlinks need both stored permissions and a stored modification date
    /// to restore attributes without traversing the link; when the platform
    /// supports the operation but the entry lacks the data, restoration
    /// fails rather than silently defaulting.
    #[error("Cannot restore attributes for {path}: missing {missing}")]
    AttributeRestoreFailed {
        /// The filesystem path whose attributes could not be restored.
        path: PathBuf,
        /// Which attribute was absent.
        missing: MissingAttribute,
    },

    /// The operation was cancelled by the user.
    ///
    /// Returned when a [`ProgressTree`] observer requests cancellation and
    /// the in-flight transfer loop observes the flag. Bytes already written
    /// for the interrupted entry remain on disk; cancellation does not roll
    /// anything back.
    ///
    /// [`ProgressTree`]: crate::progress::ProgressTree
    #[error("Operation cancelled")]
    Cancelled,

    /// The container engine rejected the archive data.
    ///
    /// The string carries the engine's description of what was malformed
    /// (bad central directory, truncated local header, and so on).
    #[error("Invalid archive: {0}")]
    InvalidFormat(String),

    /// An I/O error occurred during file operations.
    ///
    /// This wraps [`std::io::Error`] for filesystem faults outside the
    /// named conditions above. Disk-full write errors are promoted to
    /// [`DiskExhausted`][Self::DiskExhausted] wherever destination writes
    /// happen, so they do not normally appear here.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns `true` if this error indicates a security issue.
    ///
    /// Security errors should cause extraction to abort unless the archive
    /// source is fully trusted.
    pub fn is_security_error(&self) -> bool {
        matches!(self, Error::PathTraversal { .. })
    }

    /// Returns `true` if this is a data corruption error.
    ///
    /// Corruption errors indicate the archive or transferred data is
    /// damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::ChecksumMismatch { .. } | Error::InvalidFormat(_)
        )
    }

    /// Returns `true` if this error triggers deletion of the extraction's
    /// rollback ledger before surfacing.
    ///
    /// Only disk exhaustion rolls back; checksum mismatches and traversal
    /// rejections leave prior work on disk.
    pub fn triggers_rollback(&self) -> bool {
        matches!(self, Error::DiskExhausted { .. })
    }

    /// Returns `true` if this error might be recoverable.
    ///
    /// Recoverable errors are those where the operation could potentially
    /// succeed if tried again or with different parameters:
    ///
    /// - `Cancelled`: the caller can simply restart
    /// - `AlreadyExists`: retry with a different destination
    /// - `DiskExhausted`: retry after freeing space
    /// - `Io` (transient kinds only): `WouldBlock`, `Interrupted`, `TimedOut`
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::AlreadyExists { .. } => true,
            Error::DiskExhausted { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns the entry index associated with this error, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Error::ChecksumMismatch { entry_index, .. } => Some(*entry_index),
            Error::PathTraversal { entry_index, .. } => Some(*entry_index),
            _ => None,
        }
    }

    /// Returns the entry name/path associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::ChecksumMismatch { entry_name, .. } => entry_name.as_deref(),
            Error::PathTraversal { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Promotes disk-full I/O errors to [`Error::DiskExhausted`], wrapping
    /// everything else as [`Error::Io`].
    ///
    /// Used at every destination-write site so space exhaustion is always
    /// distinguishable from ordinary I/O failure.
    pub(crate) fn from_destination_io(e: io::Error) -> Error {
        if is_disk_full(&e) {
            Error::DiskExhausted { source: e }
        } else {
            Error::Io(e)
        }
    }
}

/// Returns `true` for I/O errors that report an out-of-space condition.
pub(crate) fn is_disk_full(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded
    )
}

/// A specialized `Result` type for archive orchestration.
///
/// This type alias is used throughout the crate for any operation that
/// can fail with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
