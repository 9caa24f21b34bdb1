//! Leaf rule probes that inspect live host state.
//!
//! Each rule variant is a small typed matcher decoded from YAML. The match
//! engine only sees them through the [`Rule`] trait and never inspects how a
//! probe reaches its answer.

mod cpuid;
mod device;
mod error;
mod host;
mod hostname;
mod kconfig;
mod kmod;
mod pci;
mod usb;

use std::fmt;

pub use cpuid::CpuIdRule;
pub use device::DeviceIdFilter;
pub use error::{ProbeError, Result};
pub use host::HostContext;
pub use hostname::HostnameRule;
pub use kconfig::{KconfigEntry, KconfigRule};
pub use kmod::LoadedKModRule;
pub use pci::PciIdRule;
pub use usb::UsbIdRule;

/// A single testable condition about the host.
pub trait Rule: fmt::Debug {
    fn kind(&self) -> RuleKind;

    /// `Ok(false)` means "does not hold"; `Err` means the probe itself failed.
    fn matches(&self, host: &HostContext) -> Result<bool>;
}

/// Rule variants in their fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    PciId,
    UsbId,
    LoadedKMod,
    CpuId,
    Kconfig,
    Hostname,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::PciId,
        RuleKind::UsbId,
        RuleKind::LoadedKMod,
        RuleKind::CpuId,
        RuleKind::Kconfig,
        RuleKind::Hostname,
    ];

    /// YAML key of this variant inside a `matchOn` entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::PciId => "pciId",
            RuleKind::UsbId => "usbId",
            RuleKind::LoadedKMod => "loadedKMod",
            RuleKind::CpuId => "cpuId",
            RuleKind::Kconfig => "kConfig",
            RuleKind::Hostname => "hostname",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
