//! Recursive tree copy with a pluggable per-file handler.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use dirtree_core::{DirError, Entry, EntryKind, TraversalConfig};
use dirtree_scan::TreeWalker;

use crate::make::{make_dir, MakeOptions};
use crate::summary::{OperationSummary, OperationType};

/// Copies a single regular file.
///
/// Implemented for any `Fn(&Path, &Path) -> io::Result<()>`, so a closure
/// can stand in for a full type.
pub trait CopyHandler {
    fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

impl<F> CopyHandler for F
where
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
        self(source, destination)
    }
}

/// Default handler: a plain byte copy through [`fs::copy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCopy;

impl CopyHandler for ByteCopy {
    fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
        fs::copy(source, destination).map(|_| ())
    }
}

/// Options for copy operations.
#[derive(Clone, Default)]
pub struct CopyOptions {
    /// Which entries to copy. `recursive` is always forced on.
    pub traversal: TraversalConfig,
    /// Per-file handler; [`ByteCopy`] when unset.
    pub copy_handler: Option<Arc<dyn CopyHandler + Send + Sync>>,
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("traversal", &self.traversal)
            .field("copy_handler", &self.copy_handler.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl CopyOptions {
    pub fn new(traversal: TraversalConfig) -> Self {
        Self {
            traversal,
            copy_handler: None,
        }
    }

    pub fn with_copy_handler<H>(mut self, handler: H) -> Self
    where
        H: CopyHandler + Send + Sync + 'static,
    {
        self.copy_handler = Some(Arc::new(handler));
        self
    }

    fn handler(&self) -> &dyn CopyHandler {
        match &self.copy_handler {
            Some(handler) => handler.as_ref(),
            None => &ByteCopy,
        }
    }
}

/// Copy `source` into the existing directory `destination`.
///
/// The copy lands at `destination/<basename of source>`. Directories are
/// recreated with default permissions and every accepted file goes through
/// the copy handler. Parent directories of an accepted file are created even
/// when the filter rejects them, so `include = "*.txt"` still yields a
/// well-formed tree.
///
/// With `follow_symlinks` off, a linked directory is recreated empty and a
/// linked file is skipped.
///
/// # Errors
///
/// [`DirError::DestinationMissing`] when `destination` is not a directory,
/// [`DirError::DestinationInsideSource`] when it lies under `source`,
/// [`DirError::SameFile`] when the copy would land on `source` itself (a
/// directory copied into its own parent, a file into its own directory),
/// and whatever the walk or the handler reports first.
pub fn copy_tree(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> Result<OperationSummary, DirError> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if !destination.is_dir() {
        return Err(DirError::DestinationMissing {
            path: destination.to_path_buf(),
        });
    }

    let mut traversal = options.traversal.clone();
    traversal.recursive = true;
    let follow_symlinks = traversal.follow_symlinks;
    let walker = TreeWalker::new(source, &traversal)?;

    let target_root = match source.file_name() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    };

    ensure_distinct(source, &target_root)?;

    let handler = options.handler();
    let mut summary = OperationSummary::new(OperationType::Copy);

    if walker.root_entry().is_dir() {
        ensure_outside(source, destination)?;
        make_dir(&target_root, &MakeOptions::default())?;
    }

    for entry in walker {
        let entry = entry?;
        if entry.is_dot() {
            continue;
        }

        let Some(target) = target_for(&entry, source, &target_root) else {
            warn!(path = %entry.path.display(), "Entry outside copy source");
            continue;
        };

        if entry.is_dir() {
            make_dir(&target, &MakeOptions::default())?;
            summary.record_directory();
            continue;
        }

        if entry.kind == EntryKind::SymlinkFile && (!follow_symlinks || !entry.path.exists()) {
            debug!(path = %entry.path.display(), "Skipping symlink");
            summary.record_skipped();
            continue;
        }

        if let Some(parent) = target.parent() {
            make_dir(parent, &MakeOptions::default())?;
        }

        trace!(from = %entry.path.display(), to = %target.display(), "Copying file");
        handler
            .copy_file(&entry.path, &target)
            .map_err(|source| DirError::Io {
                path: entry.path.clone(),
                source,
            })?;
        summary.record_file();
    }

    debug!(
        source = %source.display(),
        destination = %target_root.display(),
        files = summary.files,
        directories = summary.directories,
        "Copy complete"
    );
    Ok(summary)
}

/// Where `entry` lands under `target_root`.
fn target_for(entry: &Entry, source: &Path, target_root: &Path) -> Option<PathBuf> {
    if entry.depth == 0 {
        return Some(target_root.to_path_buf());
    }
    entry
        .path
        .strip_prefix(source)
        .ok()
        .map(|relative| target_root.join(relative))
}

/// Reject a copy whose target resolves to the source.
fn ensure_distinct(source: &Path, target_root: &Path) -> Result<(), DirError> {
    if fs::symlink_metadata(target_root).is_err() {
        return Ok(());
    }
    let source_path = source.canonicalize().map_err(|e| DirError::io(source, e))?;
    let target_path = target_root
        .canonicalize()
        .map_err(|e| DirError::io(target_root, e))?;

    if source_path == target_path {
        return Err(DirError::SameFile { path: source_path });
    }
    Ok(())
}

/// Reject a destination that sits inside the source tree.
fn ensure_outside(source: &Path, destination: &Path) -> Result<(), DirError> {
    let source_dir = source.canonicalize().map_err(|e| DirError::io(source, e))?;
    let destination_dir = destination
        .canonicalize()
        .map_err(|e| DirError::io(destination, e))?;

    if destination_dir.starts_with(&source_dir) {
        return Err(DirError::DestinationInsideSource {
            source_dir,
            destination: destination_dir,
        });
    }
    Ok(())
}
