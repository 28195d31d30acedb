//! Materialized listings on top of [`TreeWalker`].

use std::path::{Path, PathBuf};

use tracing::debug;

use dirtree_core::{DirError, Entry, TraversalConfig};

use crate::walker::TreeWalker;

/// List every path under `root` that passes `config`.
///
/// Paths keep the form of `root`: a relative root gives relative paths.
/// Order follows the walk (pre-order, children by name); sort the result
/// if a different order matters.
pub fn scan(root: impl AsRef<Path>, config: &TraversalConfig) -> Result<Vec<PathBuf>, DirError> {
    Ok(scan_entries(root, config)?
        .into_iter()
        .map(Entry::into_path)
        .collect())
}

/// Like [`scan`], keeping the entry kind and depth of each result.
pub fn scan_entries(
    root: impl AsRef<Path>,
    config: &TraversalConfig,
) -> Result<Vec<Entry>, DirError> {
    let root = root.as_ref();
    let entries = TreeWalker::new(root, config)?.collect::<Result<Vec<_>, _>>()?;
    debug!(root = %root.display(), count = entries.len(), "Scan complete");
    Ok(entries)
}
