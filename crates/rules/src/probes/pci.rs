use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::device::{DeviceIdFilter, DeviceIds};
use super::error::{ProbeError, Result};
use super::host::{read_hex_attr, HostContext};
use super::{Rule, RuleKind};

const PCI_DEVICES: &str = "bus/pci/devices";

/// Matches when any PCI device satisfies the attribute filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PciIdRule(pub DeviceIdFilter);

impl Rule for PciIdRule {
    fn kind(&self) -> RuleKind {
        RuleKind::PciId
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        for dev in list_pci_devices(host)? {
            if self.0.accepts(&dev) {
                debug!(class = %dev.class, vendor = %dev.vendor, device = %dev.device, "pci device matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn list_pci_devices(host: &HostContext) -> Result<Vec<DeviceIds>> {
    let root = host.sysfs(PCI_DEVICES);
    let entries = fs::read_dir(&root).map_err(|e| ProbeError::io(&root, e))?;

    let mut devices = Vec::new();
    for entry in entries {
        let dev_path = entry.map_err(|e| ProbeError::io(&root, e))?.path();
        let raw_class = read_hex_attr(&dev_path.join("class"))?;
        devices.push(DeviceIds {
            class: class_prefix(&raw_class).to_string(),
            vendor: read_hex_attr(&dev_path.join("vendor"))?,
            device: read_hex_attr(&dev_path.join("device"))?,
        });
    }
    Ok(devices)
}

/// Drop the programming-interface byte from a raw class code (`020000` → `0200`).
/// Malformed contents that cannot be cut at four bytes are kept whole.
fn class_prefix(raw: &str) -> &str {
    raw.get(..4).unwrap_or(raw)
}
