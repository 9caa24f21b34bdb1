use std::path::{Path, PathBuf};

/// Failures intrinsic to a probe, as opposed to "condition does not hold".
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid hostname pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("kernel config not found (tried {tried})")]
    MissingKernelConfig { tried: String },
}

impl ProbeError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for probe evaluation.
pub type Result<T> = std::result::Result<T, ProbeError>;
