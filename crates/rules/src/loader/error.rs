//! Error types and load result structures for the spec loader.

use std::path::PathBuf;

use crate::schema::FeatureSpec;

/// Errors that can occur while loading a single spec file or watching the directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error, including unknown fields.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Structurally valid YAML with an invalid spec (e.g. empty name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Outcome of loading a single directory entry.
#[derive(Debug)]
pub struct LoadResult {
    pub path: PathBuf,
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// File decoded; carries its specs in file order.
    Loaded { specs: Vec<FeatureSpec> },
    /// Entry was skipped (hidden file, directory).
    Skipped { reason: String },
    /// Read, parse, or validation error; the file contributes nothing.
    Failed { error: String },
}

/// Per-entry results of one directory scan, in visiting order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub results: Vec<LoadResult>,
}

impl LoadReport {
    /// All successfully loaded specs with the file they came from.
    pub fn into_specs(self) -> Vec<(PathBuf, FeatureSpec)> {
        self.results
            .into_iter()
            .filter_map(|r| match r.status {
                LoadStatus::Loaded { specs } => Some((r.path, specs)),
                _ => None,
            })
            .flat_map(|(path, specs)| specs.into_iter().map(move |s| (path.clone(), s)))
            .collect()
    }

    pub fn loaded_files(&self) -> usize {
        self.count(|s| matches!(s, LoadStatus::Loaded { .. }))
    }

    pub fn failed_files(&self) -> usize {
        self.count(|s| matches!(s, LoadStatus::Failed { .. }))
    }

    pub fn skipped_entries(&self) -> usize {
        self.count(|s| matches!(s, LoadStatus::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&LoadStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}
