use serde::{Deserialize, Serialize};

/// Attribute filter shared by the PCI and USB id rules.
///
/// A device is accepted when every non-empty list contains the device's value
/// for that attribute. Empty lists leave the attribute unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeviceIdFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendor: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device: Vec<String>,
}

/// Identity attributes of one enumerated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeviceIds {
    pub class: String,
    pub vendor: String,
    pub device: String,
}

impl DeviceIdFilter {
    pub(crate) fn accepts(&self, dev: &DeviceIds) -> bool {
        attr_accepts(&self.class, &dev.class)
            && attr_accepts(&self.vendor, &dev.vendor)
            && attr_accepts(&self.device, &dev.device)
    }
}

// Hex ids are compared case-insensitively.
fn attr_accepts(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(class: &str, vendor: &str, device: &str) -> DeviceIds {
        DeviceIds {
            class: class.to_string(),
            vendor: vendor.to_string(),
            device: device.to_string(),
        }
    }

    #[test]
    fn empty_filter_accepts_anything() {
        assert!(DeviceIdFilter::default().accepts(&dev("0200", "8086", "1533")));
    }

    #[test]
    fn every_listed_attribute_must_match() {
        let filter = DeviceIdFilter {
            class: vec!["0200".into()],
            vendor: vec!["15b3".into(), "8086".into()],
            device: vec![],
        };
        assert!(filter.accepts(&dev("0200", "8086", "1533")));
        assert!(filter.accepts(&dev("0200", "15B3", "1017")));
        assert!(!filter.accepts(&dev("0300", "8086", "1533")));
        assert!(!filter.accepts(&dev("0200", "10de", "1533")));
    }

    #[test]
    fn rejects_unknown_attribute() {
        let err = serde_yaml::from_str::<DeviceIdFilter>("vendor: [\"8086\"]\nsubsystem: [\"1\"]\n");
        assert!(err.is_err());
    }
}
