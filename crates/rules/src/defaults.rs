//! Built-in feature specs evaluated before any user configuration.

use crate::probes::{DeviceIdFilter, LoadedKModRule, PciIdRule};
use crate::schema::{FeatureSpec, MatchRule};

/// Mellanox PCI vendor id.
const MELLANOX_VENDOR: &str = "15b3";

pub fn static_specs() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new("rdma.capable").or_match(MatchRule {
            pci_id: Some(PciIdRule(DeviceIdFilter {
                vendor: vec![MELLANOX_VENDOR.to_string()],
                ..DeviceIdFilter::default()
            })),
            ..MatchRule::default()
        }),
        FeatureSpec::new("rdma.available").or_match(MatchRule {
            loaded_kmod: Some(LoadedKModRule(vec![
                "ib_uverbs".to_string(),
                "rdma_ucm".to_string(),
            ])),
            ..MatchRule::default()
        }),
    ]
}
