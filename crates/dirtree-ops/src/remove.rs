//! Post-order tree removal.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use dirtree_core::{DirError, Entry, EntryKind, TraversalConfig};
use dirtree_scan::{TraversalOrder, TreeWalker};

use crate::summary::{OperationSummary, OperationType};

/// Remove the entries under `path` that pass `config`, then `path` itself.
///
/// Children go before their parents. A directory that still holds entries
/// the filter kept is left in place and counted as skipped, so a filtered
/// removal deletes only what it matched. The root goes last, and only when
/// it passes the filter and ended up empty.
///
/// Removal never reaches outside `path`: links are unlinked, never walked,
/// whatever `follow_symlinks` says. A root that is a symlink is unlinked
/// the same way. A missing `path` is not an error: there is nothing left
/// to remove.
pub fn remove_tree(
    path: impl AsRef<Path>,
    config: &TraversalConfig,
) -> Result<OperationSummary, DirError> {
    let path = path.as_ref();
    let mut summary = OperationSummary::new(OperationType::Remove);

    let mut traversal = config.clone();
    traversal.follow_symlinks = false;

    let walker = match TreeWalker::new(path, &traversal) {
        Ok(walker) => walker.order(TraversalOrder::PostOrder),
        Err(DirError::NotFound { .. }) => {
            debug!(path = %path.display(), "Nothing to remove");
            return Ok(summary);
        }
        Err(e) => return Err(e),
    };

    let root = walker.root_entry().clone();
    let remove_root = walker.path_filter().accepts(&root);

    if root.kind.is_symlink() {
        if remove_root {
            remove_entry(&root, &mut summary)?;
        }
        return Ok(summary);
    }

    for entry in walker {
        let entry = entry?;
        if entry.is_dot() {
            continue;
        }
        remove_entry(&entry, &mut summary)?;
    }

    if root.is_dir() && remove_root {
        remove_entry(&root, &mut summary)?;
    }

    debug!(
        path = %path.display(),
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped,
        "Remove complete"
    );
    Ok(summary)
}

fn remove_entry(entry: &Entry, summary: &mut OperationSummary) -> Result<(), DirError> {
    let is_dir = entry.kind == EntryKind::Directory;
    let result = if is_dir || (cfg!(windows) && entry.kind == EntryKind::SymlinkDirectory) {
        fs::remove_dir(&entry.path)
    } else {
        fs::remove_file(&entry.path)
    };

    match result {
        Ok(()) => {
            trace!(path = %entry.path.display(), "Removed");
            if is_dir {
                summary.record_directory();
            } else {
                summary.record_file();
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            trace!(path = %entry.path.display(), "Already gone");
            Ok(())
        }
        Err(e) if is_dir && e.kind() == io::ErrorKind::DirectoryNotEmpty => {
            debug!(path = %entry.path.display(), "Directory not empty, keeping it");
            summary.record_skipped();
            Ok(())
        }
        Err(source) => Err(DirError::Io {
            path: entry.path.clone(),
            source,
        }),
    }
}
