use std::fs;
use std::path::{Path, PathBuf};

use nodefeat_core::config::{Config, HostPaths};
use tracing::warn;

use super::error::{ProbeError, Result};

/// Everything a probe needs to know about the host it is inspecting.
///
/// Passed explicitly into every [`Rule::matches`](super::Rule::matches) call so
/// tests can point probes at a fake filesystem tree and an arbitrary node name.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub node_name: String,
    pub paths: HostPaths,
}

impl HostContext {
    pub fn new(node_name: impl Into<String>, paths: HostPaths) -> Self {
        Self {
            node_name: node_name.into(),
            paths,
        }
    }

    /// Resolve the node name from config, falling back to the OS hostname.
    pub fn from_config(config: &Config) -> Self {
        let node_name = match &config.node_name {
            Some(name) => name.clone(),
            None => match ::hostname::get() {
                Ok(name) => name.to_string_lossy().into_owned(),
                Err(e) => {
                    warn!(error = %e, "failed to read hostname, hostname rules will see an empty name");
                    String::new()
                }
            },
        };
        Self::new(node_name, config.host.clone())
    }

    pub fn sysfs(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.paths.sysfs_root.join(rel)
    }

    pub fn procfs(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.paths.procfs_root.join(rel)
    }

    pub fn boot(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.paths.boot_root.join(rel)
    }
}

/// Read a small sysfs/procfs attribute file, trimmed.
pub(crate) fn read_attr(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| ProbeError::io(path, e))
}

/// Read a hex id attribute (`0x15b3\n` → `15b3`).
pub(crate) fn read_hex_attr(path: &Path) -> Result<String> {
    let raw = read_attr(path)?;
    Ok(raw.strip_prefix("0x").unwrap_or(&raw).to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn configured_node_name_wins() {
        let config = Config {
            node_name: Some("node-a".to_string()),
            ..Config::default()
        };
        let host = HostContext::from_config(&config);
        assert_eq!(host.node_name, "node-a");
        assert_eq!(host.sysfs("bus/pci/devices"), PathBuf::from("/sys/bus/pci/devices"));
    }

    #[test]
    fn hex_attr_strips_prefix_and_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vendor");
        fs::write(&path, "0x15b3\n").unwrap();
        assert_eq!(read_hex_attr(&path).unwrap(), "15b3");
    }
}
