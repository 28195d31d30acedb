//! Recursive directory creation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use dirtree_core::DirError;

/// Permission bits applied to directories created without explicit options.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

fn default_mode() -> u32 {
    DEFAULT_DIR_MODE
}

/// Options for [`make_dir`] and [`make_dirs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeOptions {
    /// Unix permission bits for every directory created, before umask.
    /// Ignored on other platforms.
    #[serde(default = "default_mode")]
    pub mode: u32,
}

impl Default for MakeOptions {
    fn default() -> Self {
        Self {
            mode: DEFAULT_DIR_MODE,
        }
    }
}

impl MakeOptions {
    pub fn with_mode(mode: u32) -> Self {
        Self { mode }
    }
}

/// Create `path` and any missing ancestors.
///
/// An existing directory is success. An existing non-directory at `path`
/// or along the way fails with [`DirError::CreateFailed`].
pub fn make_dir(path: impl AsRef<Path>, options: &MakeOptions) -> Result<(), DirError> {
    let path = path.as_ref();
    if path.is_dir() {
        trace!(path = %path.display(), "Directory already exists");
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(options.mode);
    }

    builder
        .create(path)
        .map_err(|e| DirError::create_failed(path, e))?;

    debug!(path = %path.display(), mode = format_args!("{:o}", options.mode), "Created directory");
    Ok(())
}

/// Create every path in `paths`, stopping at the first failure.
pub fn make_dirs<I, P>(paths: I, options: &MakeOptions) -> Result<(), DirError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        make_dir(path, options)?;
    }
    Ok(())
}
