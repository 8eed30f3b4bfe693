//! Attribute translation between archive entries and the filesystem.
//!
//! Zip entries carry a 32-bit external-attribute word tagged with the
//! platform that produced it. On Unix-like producers the high 16 bits hold
//! the `st_mode` value (type bits plus permission bits) and the low 16 are
//! reserved for DOS attributes. This module packs and unpacks that word,
//! supplies the fallback permissions used when an archive carries no usable
//! mode, and restores permissions and modification times onto extracted
//! files, directories, and symlinks.
//!
//! Symlinks are the delicate case: ordinary attribute calls follow the
//! link, and the target may not exist yet (or may deliberately point
//! outside the extraction). Restoration therefore goes through
//! non-traversing calls only: `lchmod` for permissions where the host
//! provides it, and a link-object timestamp call that first reads the
//! link's current access time so setting the modification time does not
//! clobber it. What the host can do is captured in [`SymlinkSupport`] so
//! orchestration code and tests read one probe instead of scattering
//! platform conditionals.

use std::path::Path;

use filetime::FileTime;

use crate::entry::{Entry, EntryKind};
use crate::error::{Error, MissingAttribute, Result};

/// Permissions applied to directories when the archive carries none.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permissions applied to files when the archive carries none.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Unix `st_mode` type bits, as stored in the attribute word's high half.
const S_IFREG: u32 = 0o100_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFLNK: u32 = 0o120_000;

/// Permission bits, including setuid/setgid/sticky.
const PERM_MASK: u32 = 0o7777;

/// `version_made_by` platform tags that store Unix modes in the word.
///
/// 3 is Unix proper; 19 is the OS X tag some Apple tooling writes.
const UNIX_PLATFORM_TAGS: [u8; 2] = [3, 19];

/// Packs an entry kind and permission bits into the external-attribute
/// word: `st_mode` in the high 16 bits, low 16 reserved.
pub fn external_attributes(kind: EntryKind, mode: u32) -> u32 {
    let type_bits = match kind {
        EntryKind::File => S_IFREG,
        EntryKind::Directory => S_IFDIR,
        EntryKind::Symlink => S_IFLNK,
    };
    (type_bits | (mode & PERM_MASK)) << 16
}

/// Unpacks permission bits from an external-attribute word.
///
/// Returns `None` when the declaring platform tag is not Unix-like or the
/// stored permission bits are zero, both cases where the word carries no
/// usable mode and extraction should fall back to the defaults.
pub fn unix_mode_from_attributes(platform_tag: u8, attributes: u32) -> Option<u32> {
    if !UNIX_PLATFORM_TAGS.contains(&platform_tag) {
        return None;
    }
    let mode = attributes >> 16;
    if mode & PERM_MASK == 0 { None } else { Some(mode) }
}

/// The permission bits to apply for an entry, stored mode or default.
///
/// A stored mode of zero counts as absent: legacy archivers write zeroed
/// attribute words, and extracting a file nobody can read helps no one.
pub fn effective_mode(kind: EntryKind, stored: Option<u32>) -> u32 {
    match stored.map(|m| m & PERM_MASK).filter(|&m| m != 0) {
        Some(mode) => mode,
        None => match kind {
            EntryKind::Directory => DEFAULT_DIR_MODE,
            EntryKind::File | EntryKind::Symlink => DEFAULT_FILE_MODE,
        },
    }
}

/// What the host OS can change on a symlink without following it.
///
/// Queried at runtime rather than branching with `cfg` at every call site,
/// so the restore logic and its tests read one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymlinkSupport {
    /// Link-object timestamps can be set (`utimensat` with no-follow, or
    /// the Windows equivalent).
    pub times: bool,
    /// Link-object permission bits can be set (`lchmod`).
    pub permissions: bool,
}

impl SymlinkSupport {
    /// The capabilities of the platform this binary was built for.
    pub fn host() -> Self {
        Self {
            times: cfg!(any(unix, windows)),
            permissions: cfg!(any(
                target_os = "macos",
                target_os = "ios",
                target_os = "freebsd"
            )),
        }
    }

    fn any(self) -> bool {
        self.times || self.permissions
    }
}

/// Restores an extracted entry's permissions and modification time.
///
/// Files and directories take the standard traversing path and are
/// best-effort: failures are logged, never escalated, matching the rest of
/// the crate's metadata handling. Symlinks go through
/// [`restore_symlink_attributes`] and its stricter contract.
pub fn restore_attributes(path: &Path, entry: &Entry) -> Result<()> {
    if entry.kind == EntryKind::Symlink {
        return restore_symlink_attributes(path, entry);
    }

    apply_permissions(path, effective_mode(entry.kind, entry.unix_mode));

    if let Some(modified) = entry.modified {
        let mtime = FileTime::from_unix_time(modified.as_unix_secs(), 0);
        if let Err(e) = filetime::set_file_mtime(path, mtime) {
            log::warn!(
                "Failed to set modification time on '{}': {}",
                path.display(),
                e
            );
        }
    }
    Ok(())
}

/// Restores a symlink's attributes without traversing the link.
///
/// On hosts that can mutate link attributes, the entry must carry both the
/// permission bits and the modification date; a missing one is
/// [`Error::AttributeRestoreFailed`] rather than a silent default, because
/// defaulting would fabricate metadata on an object whose whole point is
/// fidelity. On hosts that cannot touch link attributes at all this is a
/// no-op by design.
///
/// The modification time is set by first reading the link's current access
/// time and writing both back together, since the underlying call sets the
/// pair atomically.
pub fn restore_symlink_attributes(path: &Path, entry: &Entry) -> Result<()> {
    let support = SymlinkSupport::host();
    if !support.any() {
        return Ok(());
    }

    let mode = entry.unix_mode.ok_or_else(|| Error::AttributeRestoreFailed {
        path: path.to_path_buf(),
        missing: MissingAttribute::Permissions,
    })?;
    let modified = entry.modified.ok_or_else(|| Error::AttributeRestoreFailed {
        path: path.to_path_buf(),
        missing: MissingAttribute::ModificationDate,
    })?;

    if support.permissions {
        lchmod(path, mode & PERM_MASK)?;
    }

    if support.times {
        let metadata = path.symlink_metadata()?;
        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_unix_time(modified.as_unix_secs(), 0);
        filetime::set_symlink_file_times(path, atime, mtime)?;
    }
    Ok(())
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)) {
        log::warn!("Failed to set permissions on '{}': {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _mode: u32) {}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn lchmod(path: &Path, mode: u32) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path contains an interior NUL byte",
        ))
    })?;
    let rc = unsafe { libc::lchmod(c_path.as_ptr(), mode as libc::mode_t) };
    if rc == 0 {
        Ok(())
    } else {
        Err(Error::Io(std::io::Error::last_os_error()))
    }
}

#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "freebsd")))]
fn lchmod(_path: &Path, _mode: u32) -> Result<()> {
    // SymlinkSupport::host().permissions is false here; never called.
    Ok(())
}
