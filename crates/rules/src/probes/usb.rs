use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::device::{DeviceIdFilter, DeviceIds};
use super::error::{ProbeError, Result};
use super::host::{read_attr, HostContext};
use super::{Rule, RuleKind};

const USB_DEVICES: &str = "bus/usb/devices";

/// Class code meaning "defined per interface".
const CLASS_PER_INTERFACE: &str = "00";

/// Matches when any USB device (or one of its interfaces) satisfies the filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct UsbIdRule(pub DeviceIdFilter);

impl Rule for UsbIdRule {
    fn kind(&self) -> RuleKind {
        RuleKind::UsbId
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        for dev in list_usb_devices(host)? {
            if self.0.accepts(&dev) {
                debug!(class = %dev.class, vendor = %dev.vendor, device = %dev.device, "usb device matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Enumerate USB devices, expanding per-interface class codes into one
/// candidate per interface.
fn list_usb_devices(host: &HostContext) -> Result<Vec<DeviceIds>> {
    let root = host.sysfs(USB_DEVICES);
    let mut names = Vec::new();
    for entry in fs::read_dir(&root).map_err(|e| ProbeError::io(&root, e))? {
        let entry = entry.map_err(|e| ProbeError::io(&root, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut devices = Vec::new();
    for name in &names {
        let dev_path = root.join(name);
        // Interfaces and hub ports carry no idVendor.
        if !dev_path.join("idVendor").exists() {
            continue;
        }
        let vendor = read_attr(&dev_path.join("idVendor"))?;
        let device = read_attr(&dev_path.join("idProduct"))?;
        let class = read_attr(&dev_path.join("bDeviceClass"))?;

        if class != CLASS_PER_INTERFACE {
            devices.push(DeviceIds { class, vendor, device });
            continue;
        }

        let prefix = format!("{name}:");
        for iface in names.iter().filter(|n| n.starts_with(&prefix)) {
            let class = read_attr(&root.join(iface).join("bInterfaceClass"))?;
            devices.push(DeviceIds {
                class,
                vendor: vendor.clone(),
                device: device.clone(),
            });
        }
    }
    Ok(devices)
}
