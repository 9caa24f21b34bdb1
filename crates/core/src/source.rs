//! Interface between feature sources and the hosting labeling framework.
//!
//! The framework owns a set of sources, hands each one a config object it
//! created through [`FeatureSource::new_config`], and calls
//! [`FeatureSource::discover`] once per cycle.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::features::Features;

/// Runtime configuration object owned by a feature source.
///
/// Kept object-safe so the framework can route configs without knowing the
/// concrete type; sources downcast through [`SourceConfig::into_any`].
pub trait SourceConfig: Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Replace the contents with the decoded YAML value from the worker config file.
    fn decode(&mut self, value: serde_yaml::Value) -> Result<()>;

    /// Concrete type name, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A pluggable source of host features.
pub trait FeatureSource: Send + Sync {
    /// Constant identifier, also used as the label prefix.
    fn name(&self) -> &'static str;

    /// A fresh, empty config suitable for [`FeatureSource::set_config`].
    fn new_config(&self) -> Box<dyn SourceConfig>;

    fn config(&self) -> &dyn SourceConfig;

    /// Install a config. Fails when the object was not produced for this source.
    fn set_config(&mut self, config: Box<dyn SourceConfig>) -> Result<()>;

    fn discover(&self) -> Result<Features>;
}

/// Worker config file layout: per-source sections under `sources`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkerFile {
    #[serde(default)]
    sources: BTreeMap<String, serde_yaml::Value>,
}

/// Route each `sources.<name>` section of a worker config file to the
/// matching source. Sections naming an unknown source are logged and ignored.
pub fn configure_sources(sources: &mut [Box<dyn FeatureSource>], yaml: &str) -> Result<()> {
    let file: WorkerFile = if yaml.trim().is_empty() {
        WorkerFile::default()
    } else {
        serde_yaml::from_str::<Option<WorkerFile>>(yaml)?.unwrap_or_default()
    };

    for (name, value) in file.sources {
        let Some(source) = sources.iter_mut().find(|s| s.name() == name) else {
            warn!(source = %name, "config for unknown feature source ignored");
            continue;
        };
        let mut config = source.new_config();
        config.decode(value)?;
        source.set_config(config)?;
        info!(source = %name, "applied source config");
    }
    Ok(())
}
