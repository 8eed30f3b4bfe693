//! Destination containment validation.
//!
//! Every resolved extraction path must land strictly inside the
//! destination root before a single byte is written. The check is lexical:
//! candidate paths do not exist yet at validation time, so `..` and `.`
//! segments are resolved without consulting the filesystem, and the
//! containment comparison respects path-segment boundaries (`/dst2` is not
//! inside `/dst`, despite the string prefix).

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically resolves `.` and `..` segments without touching the
/// filesystem.
///
/// `..` pops the previously collected segment; on an absolute path it
/// cannot climb above the root, so `/dst/../../x` normalizes to `/x`.
/// Symlinks are deliberately not resolved; callers canonicalize the
/// *root* once up front and build candidates on top of it, which keeps the
/// comparison consistent without stat'ing paths that do not exist yet.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Returns `true` iff `candidate` lies strictly inside `root`.
///
/// Both paths are normalized lexically first; the comparison then requires
/// `root` to be a true path-segment prefix of `candidate`, and `candidate`
/// to differ from `root` itself. Both arguments should be absolute: the
/// orchestrator always passes the canonicalized destination root and a
/// candidate joined onto it.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use zipnest::safety::is_contained;
///
/// assert!(is_contained(Path::new("/dst/a/b"), Path::new("/dst")));
/// assert!(!is_contained(Path::new("/dst2/a"), Path::new("/dst")));
/// assert!(!is_contained(Path::new("/dst"), Path::new("/dst")));
/// ```
pub fn is_contained(candidate: &Path, root: &Path) -> bool {
    let candidate = normalize_lexically(candidate);
    let root = normalize_lexically(root);
    candidate != root && candidate.starts_with(&root)
}

/// Validates one entry's resolved destination against the extraction root.
///
/// Returns the normalized path to create, or [`Error::PathTraversal`]
/// carrying the entry's index and decoded name. Traversal is fatal for the
/// whole extraction; callers never downgrade it to a skip.
pub fn validate_destination(
    root: &Path,
    candidate: &Path,
    entry_index: usize,
    entry_name: &str,
) -> Result<PathBuf> {
    let normalized = normalize_lexically(candidate);
    if is_contained(&normalized, root) {
        Ok(normalized)
    } else {
        Err(Error::PathTraversal {
            entry_index,
            path: entry_name.to_string(),
        })
    }
}
