//! Tree walking engine for dirtree.
//!
//! `dirtree-scan` walks a directory tree depth-first and reports the entries
//! that pass a [`TraversalConfig`]. The same walker drives listing, copying
//! and removal, so all three agree on what a filter selects.
//!
//! - **Lazy traversal** via [`TreeWalker`], an iterator of entries
//! - **Pre- or post-order** reporting via [`TraversalOrder`]
//! - **Glob filters** on the full path, compiled once per walk
//! - **Symlink cycle detection** by directory identity
//!
//! # Example
//!
//! ```rust,no_run
//! use dirtree_scan::{scan, EntryType, TraversalConfig};
//!
//! let config = TraversalConfig::builder()
//!     .include("*.txt")
//!     .entry_type(EntryType::File)
//!     .build()
//!     .unwrap();
//!
//! for path in scan("spec/fixture", &config).unwrap() {
//!     println!("{}", path.display());
//! }
//! ```

mod enumerate;
mod filter;
mod identity;
mod walker;

pub use enumerate::{scan, scan_entries};
pub use filter::PathFilter;
pub use identity::DirIdentity;
pub use walker::{TraversalOrder, TreeWalker};

// Re-export core types for convenience
pub use dirtree_core::{
    DirError, Entry, EntryKind, EntryType, TraversalConfig, TraversalConfigBuilder,
};
