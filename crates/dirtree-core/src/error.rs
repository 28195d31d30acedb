//! Error types for tree operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning, copying, removing or creating trees.
#[derive(Debug, Error)]
pub enum DirError {
    /// The root of an operation does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The copy destination is not an existing directory.
    #[error("Unexisting destination path `{path}`.")]
    DestinationMissing { path: PathBuf },

    /// The copy destination lies inside the source tree.
    #[error("Cannot copy {source_dir} into itself ({destination})")]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// The copy would write every file onto itself.
    #[error("Source and destination are the same: {path}")]
    SameFile { path: PathBuf },

    /// A directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read, write or delete failed on one entry.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include or exclude glob failed to compile.
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl DirError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a directory creation error.
    pub fn create_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateFailed {
            path: path.into(),
            source,
        }
    }

    /// The path this error is about, when there is a single one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path }
            | Self::DestinationMissing { path }
            | Self::SameFile { path }
            | Self::CreateFailed { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::DestinationInsideSource { destination, .. } => Some(destination),
            Self::InvalidPattern { .. } => None,
        }
    }
}
