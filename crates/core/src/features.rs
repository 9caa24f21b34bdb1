use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value emitted for a discovered feature.
///
/// A feature without an override value is reported as `true`; one with an
/// override carries that string verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Str(String),
}

impl FeatureValue {
    /// Value for a matched feature with an optional override.
    pub fn for_match(value: Option<&str>) -> Self {
        match value {
            Some(v) => Self::Str(v.to_string()),
            None => Self::Bool(true),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Flat feature name → value mapping produced by one discovery cycle.
pub type Features = BTreeMap<String, FeatureValue>;

/// Node label key for a feature: `<namespace>/<source>-<feature>`.
pub fn label_name(namespace: &str, source: &str, feature: &str) -> String {
    format!("{namespace}/{source}-{feature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_match_without_override_is_true() {
        assert_eq!(FeatureValue::for_match(None), FeatureValue::Bool(true));
        assert_eq!(FeatureValue::for_match(None).to_string(), "true");
    }

    #[test]
    fn for_match_with_override_keeps_string() {
        let v = FeatureValue::for_match(Some("gold"));
        assert_eq!(v, FeatureValue::Str("gold".to_string()));
        assert_eq!(v.to_string(), "gold");
    }

    #[test]
    fn label_name_joins_namespace_source_and_feature() {
        assert_eq!(
            label_name("feature.node.kubernetes.io", "custom", "rdma.capable"),
            "feature.node.kubernetes.io/custom-rdma.capable"
        );
    }

    #[test]
    fn serializes_untagged() {
        let mut features = Features::new();
        features.insert("a".to_string(), FeatureValue::Bool(true));
        features.insert("b".to_string(), FeatureValue::Str("x".to_string()));
        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"{"a":true,"b":"x"}"#);
    }
}
