//! Outcome counters for tree operations.

use serde::{Deserialize, Serialize};

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Copy,
    Remove,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Remove => write!(f, "Remove"),
        }
    }
}

/// What a finished copy or remove did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Directories created or removed.
    pub directories: usize,
    /// Files copied or removed.
    pub files: usize,
    /// Entries left alone (unfollowed links, non-empty directories).
    pub skipped: usize,
}

impl OperationSummary {
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            directories: 0,
            files: 0,
            skipped: 0,
        }
    }

    pub(crate) fn record_directory(&mut self) {
        self.directories += 1;
    }

    pub(crate) fn record_file(&mut self) {
        self.files += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Number of entries actually written or deleted.
    pub fn total(&self) -> usize {
        self.directories + self.files
    }

    /// True when the operation touched nothing.
    pub fn is_empty(&self) -> bool {
        self.total() == 0 && self.skipped == 0
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Remove => "Removed",
        };

        let base = format!(
            "{} {} {} and {} {}",
            action,
            self.files,
            plural(self.files, "file", "files"),
            self.directories,
            plural(self.directories, "directory", "directories"),
        );

        if self.skipped == 0 {
            base
        } else {
            format!("{}, {} skipped", base, self.skipped)
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
