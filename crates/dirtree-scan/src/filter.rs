//! Per-entry filter decisions.

use std::borrow::Cow;
use std::path::{Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use globset::{Glob, GlobMatcher};

use dirtree_core::{DirError, Entry, EntryType, TraversalConfig};

/// Compiled form of the dots/type/include/exclude part of a [`TraversalConfig`].
///
/// Recursion and leaves-only pruning depend on the shape of the subtree, so
/// they live in the walker rather than here.
#[derive(Debug, Clone)]
pub struct PathFilter {
    skip_dots: bool,
    entry_type: EntryType,
    include: Option<GlobMatcher>,
    exclude: Option<GlobMatcher>,
}

impl PathFilter {
    /// Compile the filter for a traversal config.
    pub fn new(config: &TraversalConfig) -> Result<Self, DirError> {
        Ok(Self {
            skip_dots: config.skip_dots,
            entry_type: config.entry_type,
            include: compile(config.include.as_deref())?,
            exclude: compile(config.exclude.as_deref())?,
        })
    }

    /// Decide whether an entry belongs in the result.
    ///
    /// Rules run in order and stop at the first rejection: dots, type,
    /// include, exclude. An entry matching both globs is excluded.
    pub fn accepts(&self, entry: &Entry) -> bool {
        if self.skip_dots && entry.is_dot() {
            return false;
        }
        if !self.entry_type.admits(entry.kind) {
            return false;
        }
        if self.include.is_none() && self.exclude.is_none() {
            return true;
        }

        let normalized = normalize_path(&entry.path);
        if let Some(include) = &self.include {
            if !include.is_match(normalized.as_ref()) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(normalized.as_ref()) {
                return false;
            }
        }
        true
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<GlobMatcher>, DirError> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };
    let glob = Glob::new(pattern).map_err(|e| DirError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.kind().to_string(),
    })?;
    Ok(Some(glob.compile_matcher()))
}

/// Render a path with the host's native separator throughout.
pub(crate) fn normalize_path(path: &Path) -> Cow<'_, str> {
    let raw = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' || !raw.contains('/') {
        return raw;
    }
    Cow::Owned(raw.replace('/', MAIN_SEPARATOR_STR))
}
