//! Tree operations for dirtree.
//!
//! Everything here is driven by the same [`TreeWalker`](dirtree_scan::TreeWalker)
//! as listing, so a [`TraversalConfig`] selects the same entries whether it
//! is used to scan, copy, or remove.
//!
//! - [`copy_tree`] replicates a tree, with a pluggable [`CopyHandler`]
//! - [`remove_tree`] deletes children before parents
//! - [`make_dir`] / [`make_dirs`] create directories like `mkdir -p`
//! - [`tempnam`] picks an unused path without creating it
//!
//! Operations run synchronously and stop at the first hard error. Work
//! already done at that point is not rolled back.

mod copy;
mod make;
mod remove;
mod summary;
mod tempnam;

pub use copy::{copy_tree, ByteCopy, CopyHandler, CopyOptions};
pub use make::{make_dir, make_dirs, MakeOptions, DEFAULT_DIR_MODE};
pub use remove::remove_tree;
pub use summary::{OperationSummary, OperationType};
pub use tempnam::tempnam;

pub use dirtree_core::{DirError, EntryType, TraversalConfig, TraversalConfigBuilder};
