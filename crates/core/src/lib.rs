pub mod config;
pub mod error;
pub mod features;
pub mod source;

pub use config::Config;
pub use error::*;
pub use features::*;
pub use source::{configure_sources, FeatureSource, SourceConfig};
