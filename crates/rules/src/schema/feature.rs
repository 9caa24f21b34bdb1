//! Feature specification and match-rule types.

use serde::{Deserialize, Serialize};

use crate::probes::{
    CpuIdRule, HostnameRule, KconfigRule, LoadedKModRule, PciIdRule, Rule, UsbIdRule,
};

/// Conjunction of at most one rule per variant.
///
/// Absent variants do not constrain the match; an entry with no variants
/// at all matches every host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatchRule {
    #[serde(rename = "pciId", default, skip_serializing_if = "Option::is_none")]
    pub pci_id: Option<PciIdRule>,
    #[serde(rename = "usbId", default, skip_serializing_if = "Option::is_none")]
    pub usb_id: Option<UsbIdRule>,
    #[serde(rename = "loadedKMod", default, skip_serializing_if = "Option::is_none")]
    pub loaded_kmod: Option<LoadedKModRule>,
    #[serde(rename = "cpuId", default, skip_serializing_if = "Option::is_none")]
    pub cpu_id: Option<CpuIdRule>,
    #[serde(rename = "kConfig", default, skip_serializing_if = "Option::is_none")]
    pub kconfig: Option<KconfigRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<HostnameRule>,
}

impl MatchRule {
    /// Present rules in evaluation order: PCI, USB, kmod, CPU, kconfig, hostname.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        [
            self.pci_id.as_ref().map(|r| r as &dyn Rule),
            self.usb_id.as_ref().map(|r| r as &dyn Rule),
            self.loaded_kmod.as_ref().map(|r| r as &dyn Rule),
            self.cpu_id.as_ref().map(|r| r as &dyn Rule),
            self.kconfig.as_ref().map(|r| r as &dyn Rule),
            self.hostname.as_ref().map(|r| r as &dyn Rule),
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_vacuous(&self) -> bool {
        self.rules().next().is_none()
    }
}

/// A named feature and the alternative rule sets that make it present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    pub name: String,
    /// Emitted instead of `true` when the feature matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "matchOn", default)]
    pub match_on: Vec<MatchRule>,
}

impl FeatureSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            match_on: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append an alternative.
    pub fn or_match(mut self, rule: MatchRule) -> Self {
        self.match_on.push(rule);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("feature name must not be empty".to_string());
        }
        Ok(())
    }

    /// Strictly decode a YAML list of specs. An empty or `null` document is an empty list.
    pub fn parse_list(yaml: &str) -> Result<Vec<FeatureSpec>, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Vec::new());
        }
        let specs: Option<Vec<FeatureSpec>> = serde_yaml::from_str(yaml)?;
        Ok(specs.unwrap_or_default())
    }
}
