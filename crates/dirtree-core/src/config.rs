//! Traversal configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;

/// Which kinds of entries a traversal reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Files and directories alike.
    #[default]
    Any,
    /// Only non-directories (regular files and links to them).
    File,
    /// Only directories (real or reached through a symlink).
    Directory,
}

impl EntryType {
    /// Check whether an entry of the given kind passes this type filter.
    pub fn admits(&self, kind: EntryKind) -> bool {
        match self {
            EntryType::Any => true,
            EntryType::File => !kind.is_dir(),
            EntryType::Directory => kind.is_dir(),
        }
    }
}

/// Configuration shared by scan, copy and remove.
///
/// Built once per call and never mutated by the operation that consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TraversalConfig {
    /// Descend below the root's immediate children.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Restrict results to files or directories.
    #[builder(default)]
    #[serde(default, rename = "type")]
    pub entry_type: EntryType,

    /// Suppress the `.` and `..` entries.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub skip_dots: bool,

    /// Descend into directories reached through symbolic links.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    /// Report a directory only when nothing below it matched.
    #[builder(default = "false")]
    #[serde(default)]
    pub leaves_only: bool,

    /// Glob the full path must match.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub include: Option<String>,

    /// Glob that rejects a full path, even when it matched `include`.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub exclude: Option<String>,
}

fn default_true() -> bool {
    true
}

impl TraversalConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        for (label, pattern) in [("include", &self.include), ("exclude", &self.exclude)] {
            if let Some(Some(pattern)) = pattern {
                if pattern.is_empty() {
                    return Err(format!("{label} pattern cannot be empty"));
                }
            }
        }
        Ok(())
    }
}

impl TraversalConfig {
    /// Create a new traversal config builder.
    pub fn builder() -> TraversalConfigBuilder {
        TraversalConfigBuilder::default()
    }

    /// Create a config with every option at its default.
    pub fn new() -> Self {
        Self {
            recursive: true,
            entry_type: EntryType::Any,
            skip_dots: true,
            follow_symlinks: true,
            leaves_only: false,
            include: None,
            exclude: None,
        }
    }

    /// Whether leaves-only pruning is in effect.
    ///
    /// A shallow listing has no deeper levels to prune against.
    pub fn prunes_to_leaves(&self) -> bool {
        self.leaves_only && self.recursive
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::new()
    }
}
