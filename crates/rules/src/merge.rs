//! Assembles the evaluation list from every configuration provenance.
//!
//! Order is fixed: built-in defaults, then runtime-supplied config, then the
//! dynamic config directory. Nothing is deduplicated; specs sharing a name are
//! all evaluated and the last match wins in the output map.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::defaults::static_specs;
use crate::loader::SpecLoader;
use crate::schema::FeatureSpec;

/// Where a spec in the merged list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Static,
    Runtime,
    Dynamic(PathBuf),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Static => f.write_str("static"),
            Provenance::Runtime => f.write_str("runtime"),
            Provenance::Dynamic(path) => write!(f, "file:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedSpec {
    pub provenance: Provenance,
    pub spec: FeatureSpec,
}

/// Build the full evaluation list for one discovery cycle.
pub fn merged_specs(runtime: &[FeatureSpec], loader: &SpecLoader) -> Vec<MergedSpec> {
    merge(static_specs(), runtime, loader.load_all().into_specs())
}

/// Concatenate the three provenances in their fixed order.
pub fn merge(
    static_specs: Vec<FeatureSpec>,
    runtime: &[FeatureSpec],
    dynamic: Vec<(PathBuf, FeatureSpec)>,
) -> Vec<MergedSpec> {
    let mut merged = Vec::with_capacity(static_specs.len() + runtime.len() + dynamic.len());

    merged.extend(static_specs.into_iter().map(|spec| MergedSpec {
        provenance: Provenance::Static,
        spec,
    }));
    merged.extend(runtime.iter().cloned().map(|spec| MergedSpec {
        provenance: Provenance::Runtime,
        spec,
    }));
    merged.extend(dynamic.into_iter().map(|(path, spec)| MergedSpec {
        provenance: Provenance::Dynamic(path),
        spec,
    }));

    debug!(count = merged.len(), "merged custom feature specs");
    merged
}
