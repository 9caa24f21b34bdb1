use thiserror::Error;

/// Errors surfaced by a feature source to the hosting framework.
#[derive(Error, Debug)]
pub enum SourceError {
    /// `set_config` was handed a config object built for another source.
    #[error("invalid config type for source '{source_name}': got {found}")]
    InvalidConfig {
        source_name: &'static str,
        found: &'static str,
    },

    #[error("config decode error: {0}")]
    Decode(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
