//! Directory identity for symlink cycle detection.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Identity of a resolved directory.
///
/// Two different textual paths can alias the same directory through
/// symlinks, so identity comes from the filesystem, not from the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirIdentity {
    /// Device and inode pair.
    Inode { device: u64, inode: u64 },
    /// Canonical path, where inode numbers are unavailable.
    Canonical(PathBuf),
}

impl DirIdentity {
    /// Resolve the identity of the directory at `path`, following links.
    #[cfg(unix)]
    pub fn of(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::Inode {
            device: metadata.dev(),
            inode: metadata.ino(),
        })
    }

    /// Resolve the identity of the directory at `path`, following links.
    #[cfg(not(unix))]
    pub fn of(path: &Path) -> io::Result<Self> {
        path.canonicalize().map(Self::Canonical)
    }
}
