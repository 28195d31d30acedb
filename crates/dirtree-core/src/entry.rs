//! Entries produced while walking a tree.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Resolved kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory).
    File,
    /// Directory.
    Directory,
    /// Symbolic link to a non-directory. Dangling links land here too.
    SymlinkFile,
    /// Symbolic link to a directory.
    SymlinkDirectory,
}

impl EntryKind {
    /// Check if this entry is a directory, directly or through a link.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory | EntryKind::SymlinkDirectory)
    }

    /// Check if this entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::SymlinkFile | EntryKind::SymlinkDirectory)
    }

    /// Check if this entry is a non-directory.
    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }

    /// Classify from the link-level and resolved file types.
    ///
    /// `resolved` is `None` when a symlink's target does not exist.
    pub fn classify(link: std::fs::FileType, resolved: Option<std::fs::FileType>) -> Self {
        if !link.is_symlink() {
            return if link.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
        }
        match resolved {
            Some(target) if target.is_dir() => EntryKind::SymlinkDirectory,
            _ => EntryKind::SymlinkFile,
        }
    }
}

/// A single node met during a walk.
///
/// Entries are transient: they describe what the walker saw and are not
/// refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Path in the same form as the walk root (`root.join(relative)`).
    pub path: PathBuf,
    /// Basename as seen by the walker, `.` and `..` included.
    pub name: CompactString,
    /// Resolved entry kind.
    pub kind: EntryKind,
    /// Depth relative to the walk root (the root is 0).
    pub depth: usize,
}

impl Entry {
    /// Create a new entry.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<CompactString>,
        kind: EntryKind,
        depth: usize,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            depth,
        }
    }

    /// Create a synthesized `.` or `..` entry inside `dir`.
    pub fn dot(dir: &Path, name: &str, depth: usize) -> Self {
        Self::new(dir.join(name), name, EntryKind::Directory, depth)
    }

    /// Check if this is a `.` or `..` entry.
    pub fn is_dot(&self) -> bool {
        is_dot_name(&self.name)
    }

    /// Check if this entry is a directory, directly or through a link.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Consume the entry, keeping only its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Check whether a basename is one of the self/parent entries.
pub fn is_dot_name(name: &str) -> bool {
    name == "." || name == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_discrimination() {
        assert!(EntryKind::Directory.is_dir());
        assert!(EntryKind::SymlinkDirectory.is_dir());
        assert!(EntryKind::SymlinkDirectory.is_symlink());
        assert!(EntryKind::File.is_file());
        assert!(EntryKind::SymlinkFile.is_file());
        assert!(!EntryKind::Directory.is_symlink());
    }

    #[test]
    fn test_dot_entries() {
        let dot = Entry::dot(Path::new("root"), ".", 1);
        assert!(dot.is_dot());
        assert!(dot.is_dir());
        assert_eq!(dot.path.to_string_lossy(), "root/.");

        let file = Entry::new("root/file1.txt", "file1.txt", EntryKind::File, 1);
        assert!(!file.is_dot());
        assert!(is_dot_name(".."));
        assert!(!is_dot_name("..."));
    }
}
