//! Core types for dirtree.
//!
//! This crate holds the data shared by the walker and the tree operations:
//! the traversal configuration, the entries a walk produces, and the error
//! type every operation returns.

mod config;
mod entry;
mod error;

pub use config::{EntryType, TraversalConfig, TraversalConfigBuilder, TraversalConfigBuilderError};
pub use entry::{is_dot_name, Entry, EntryKind};
pub use error::DirError;
