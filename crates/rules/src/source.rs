//! The `custom` feature source: merges configured specs and evaluates them.

use std::any::Any;
use std::path::PathBuf;

use nodefeat_core::{FeatureSource, FeatureValue, Features, SourceConfig, SourceError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::evaluator::evaluate;
use crate::loader::SpecLoader;
use crate::merge::{merged_specs, MergedSpec};
use crate::probes::HostContext;
use crate::schema::FeatureSpec;

pub const SOURCE_NAME: &str = "custom";

/// Runtime-supplied specs, decoded from the `sources.custom` worker config key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CustomConfig(pub Vec<FeatureSpec>);

impl SourceConfig for CustomConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn decode(&mut self, value: serde_yaml::Value) -> nodefeat_core::Result<()> {
        self.0 = if value.is_null() {
            Vec::new()
        } else {
            serde_yaml::from_value(value)?
        };
        Ok(())
    }
}

/// Feature source evaluating user-defined match rules against the host.
#[derive(Debug)]
pub struct CustomSource {
    config: CustomConfig,
    host: HostContext,
    loader: SpecLoader,
}

impl CustomSource {
    pub fn new(host: HostContext, config_dir: PathBuf) -> Self {
        Self {
            config: CustomConfig::default(),
            host,
            loader: SpecLoader::new(config_dir),
        }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn loader(&self) -> &SpecLoader {
        &self.loader
    }

    /// Static, runtime, and directory specs in evaluation order.
    pub fn merged_specs(&self) -> Vec<MergedSpec> {
        merged_specs(&self.config.0, &self.loader)
    }

    /// Run one discovery cycle. Specs whose rules fail to evaluate are
    /// logged and left out; the cycle itself always completes.
    pub fn discover_features(&self) -> Features {
        let mut features = Features::new();

        for MergedSpec { provenance, spec } in self.merged_specs() {
            if let Err(e) = spec.validate() {
                error!(provenance = %provenance, error = %e, "skipping invalid feature spec");
                continue;
            }

            match evaluate(&spec, &self.host) {
                Ok(true) => {
                    let value = FeatureValue::for_match(spec.value.as_deref());
                    debug!(feature = %spec.name, provenance = %provenance, value = %value, "feature present");
                    if let Some(previous) = features.insert(spec.name.clone(), value) {
                        debug!(feature = %spec.name, previous = %previous, "overwrote earlier value for duplicate feature name");
                    }
                }
                Ok(false) => {
                    debug!(feature = %spec.name, provenance = %provenance, "feature not present");
                }
                Err(e) => {
                    error!(feature = %spec.name, provenance = %provenance, error = %e, "failed to discover feature");
                }
            }
        }

        info!(count = features.len(), "custom features discovered");
        features
    }
}

impl FeatureSource for CustomSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn new_config(&self) -> Box<dyn SourceConfig> {
        Box::new(CustomConfig::default())
    }

    fn config(&self) -> &dyn SourceConfig {
        &self.config
    }

    fn set_config(&mut self, config: Box<dyn SourceConfig>) -> nodefeat_core::Result<()> {
        let found = config.type_name();
        match config.into_any().downcast::<CustomConfig>() {
            Ok(config) => {
                self.config = *config;
                Ok(())
            }
            Err(_) => {
                error!(source = SOURCE_NAME, found, "invalid config type");
                Err(SourceError::InvalidConfig {
                    source_name: SOURCE_NAME,
                    found,
                })
            }
        }
    }

    fn discover(&self) -> nodefeat_core::Result<Features> {
        Ok(self.discover_features())
    }
}
