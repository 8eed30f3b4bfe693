//! Archive entry types.

use crate::timestamp::DosDateTime;

/// The kind of filesystem object an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file with byte content.
    File,
    /// A directory.
    Directory,
    /// A symbolic link; the entry content is the link target text.
    Symlink,
}

/// One record enumerated from an open archive container session.
///
/// Entries are produced by the container when the session opens and are
/// immutable from then on; the orchestration core only reads them. Their
/// lifetime is the open session's; indexes refer back into the session's
/// enumeration order.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Position in the container's enumeration order.
    pub index: usize,
    /// The decoded path within the archive.
    ///
    /// Decoding happens once when the session opens, using the session's
    /// [`NameDecoding`](crate::encoding::NameDecoding); components are
    /// separated by `/` regardless of host platform.
    pub name: String,
    /// What kind of filesystem object the entry records.
    pub kind: EntryKind,
    /// CRC-32 checksum of the entry's uncompressed content.
    ///
    /// Directories checksum as zero. For symlinks this covers the target
    /// text.
    pub checksum: u32,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Unix permission and type bits decoded from the entry's
    /// external-attribute word.
    ///
    /// `None` when the archive's platform tag is not Unix-like or the
    /// stored value is zero; extraction then falls back to the default
    /// modes in [`attrs`](crate::attrs).
    pub unix_mode: Option<u32>,
    /// Modification time decoded from the entry's MS-DOS timestamp.
    pub modified: Option<DosDateTime>,
}

impl Entry {
    /// Returns true if this entry records a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns true if this entry records a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns true if this entry records a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Number of path components in the decoded path.
    ///
    /// Trailing separators do not count: `"dir/"` has one component,
    /// `"dir/file"` has two. Shape classification sorts entries by this
    /// value.
    pub fn depth(&self) -> usize {
        self.name.split('/').filter(|c| !c.is_empty()).count()
    }
}
