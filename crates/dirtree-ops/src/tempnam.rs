//! Unique path naming without creating anything.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::trace;

use dirtree_core::DirError;

/// Length of the random part of a generated name.
const SUFFIX_LEN: usize = 12;

/// Candidates tried before giving up.
const MAX_ATTEMPTS: usize = 64;

/// Pick a path under `base` (the system temp dir when `None`) whose file
/// name starts with `prefix` and that does not exist right now.
///
/// Nothing is created, so another process may claim the name before the
/// caller does.
pub fn tempnam(base: Option<&Path>, prefix: &str) -> Result<PathBuf, DirError> {
    let base = base.map_or_else(std::env::temp_dir, Path::to_path_buf);

    for _ in 0..MAX_ATTEMPTS {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect();
        let candidate = base.join(format!("{prefix}{suffix}"));

        match fs::symlink_metadata(&candidate) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %candidate.display(), "Picked temporary name");
                return Ok(candidate);
            }
            Err(source) => {
                return Err(DirError::Io {
                    path: candidate,
                    source,
                });
            }
            Ok(_) => continue,
        }
    }

    Err(DirError::Io {
        path: base,
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no unused name with prefix `{prefix}` after {MAX_ATTEMPTS} attempts"),
        ),
    })
}
