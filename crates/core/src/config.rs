use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Directory mounted from ConfigMaps with additional custom feature specs.
pub const DEFAULT_CUSTOM_CONFIG_DIR: &str = "/etc/kubernetes/node-feature-discovery/custom.d";

pub const DEFAULT_LABEL_NAMESPACE: &str = "feature.node.kubernetes.io";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kubernetes node name; `None` falls back to the OS hostname.
    pub node_name: Option<String>,
    pub custom_config_dir: PathBuf,
    pub host: HostPaths,
    pub worker: WorkerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            node_name: env_opt("NODE_NAME"),
            custom_config_dir: PathBuf::from(env_or(
                "NODEFEAT_CUSTOM_CONFIG_DIR",
                DEFAULT_CUSTOM_CONFIG_DIR,
            )),
            host: HostPaths::from_env(),
            worker: WorkerConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  node:        name={}", self.node_name.as_deref().unwrap_or("(hostname)"));
        tracing::info!("  custom:      config_dir={}", self.custom_config_dir.display());
        tracing::info!(
            "  host:        sysfs={}, procfs={}, boot={}",
            self.host.sysfs_root.display(),
            self.host.procfs_root.display(),
            self.host.boot_root.display()
        );
        if let Some(kconfig) = &self.host.kconfig_file {
            tracing::info!("  kconfig:     file={}", kconfig.display());
        }
        tracing::info!(
            "  worker:      interval={}s, namespace={}",
            self.worker.sleep_interval.as_secs(),
            self.worker.label_namespace
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_name: None,
            custom_config_dir: PathBuf::from(DEFAULT_CUSTOM_CONFIG_DIR),
            host: HostPaths::default(),
            worker: WorkerConfig::default(),
        }
    }
}

// ── Host filesystem roots ─────────────────────────────────────

/// Where probes read live system state from. Overridable for containers
/// that mount the host's `/sys` and `/proc` elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostPaths {
    pub sysfs_root: PathBuf,
    pub procfs_root: PathBuf,
    pub boot_root: PathBuf,
    /// Explicit kernel config file, bypassing the `/proc/config.gz` and `/boot` lookup.
    pub kconfig_file: Option<PathBuf>,
}

impl HostPaths {
    fn from_env() -> Self {
        Self {
            sysfs_root: PathBuf::from(env_or("NODEFEAT_SYSFS_ROOT", "/sys")),
            procfs_root: PathBuf::from(env_or("NODEFEAT_PROCFS_ROOT", "/proc")),
            boot_root: PathBuf::from(env_or("NODEFEAT_BOOT_ROOT", "/boot")),
            kconfig_file: env_opt("NODEFEAT_KCONFIG_FILE").map(PathBuf::from),
        }
    }
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from("/sys"),
            procfs_root: PathBuf::from("/proc"),
            boot_root: PathBuf::from("/boot"),
            kconfig_file: None,
        }
    }
}

// ── Worker ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub sleep_interval: Duration,
    pub label_namespace: String,
    /// Worker config file carrying per-source runtime configuration.
    pub config_file: Option<PathBuf>,
}

impl WorkerConfig {
    fn from_env() -> Self {
        Self {
            sleep_interval: Duration::from_secs(env_u64("NODEFEAT_SLEEP_INTERVAL", 60)),
            label_namespace: env_or("NODEFEAT_LABEL_NAMESPACE", DEFAULT_LABEL_NAMESPACE),
            config_file: env_opt("NODEFEAT_CONFIG").map(PathBuf::from),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sleep_interval: Duration::from_secs(60),
            label_namespace: DEFAULT_LABEL_NAMESPACE.to_string(),
            config_file: None,
        }
    }
}
