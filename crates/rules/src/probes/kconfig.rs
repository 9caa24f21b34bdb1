use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProbeError, Result};
use super::host::{read_attr, HostContext};
use super::{Rule, RuleKind};

/// Normalised value of a `=y` or `=m` option.
const ENABLED: &str = "true";

/// One `NAME` or `NAME=value` requirement on the kernel configuration.
///
/// A bare `NAME` requires the option to be built in or built as a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KconfigEntry {
    pub name: String,
    pub value: String,
}

impl From<String> for KconfigEntry {
    fn from(raw: String) -> Self {
        match raw.split_once('=') {
            Some((name, value)) => Self {
                name: name.to_string(),
                value: value.to_string(),
            },
            None => Self {
                name: raw,
                value: ENABLED.to_string(),
            },
        }
    }
}

impl From<KconfigEntry> for String {
    fn from(entry: KconfigEntry) -> Self {
        if entry.value == ENABLED {
            entry.name
        } else {
            format!("{}={}", entry.name, entry.value)
        }
    }
}

/// Matches when every entry agrees with the running kernel's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct KconfigRule(pub Vec<KconfigEntry>);

impl Rule for KconfigRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Kconfig
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        let config = kernel_config(host)?;
        for entry in &self.0 {
            if config.get(&entry.name) != Some(&entry.value) {
                debug!(option = %entry.name, expected = %entry.value, "kernel config option differs");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Locate and parse the running kernel's configuration.
///
/// Lookup order: explicit file, `<procfs>/config.gz`, `<boot>/config-<osrelease>`.
fn kernel_config(host: &HostContext) -> Result<HashMap<String, String>> {
    if let Some(path) = &host.paths.kconfig_file {
        return read_config_file(path).map(|raw| parse_kconfig(&raw));
    }

    let mut tried = Vec::new();

    let gz = host.procfs("config.gz");
    if gz.exists() {
        return read_config_file(&gz).map(|raw| parse_kconfig(&raw));
    }
    tried.push(gz);

    if let Ok(release) = read_attr(&host.procfs("sys/kernel/osrelease")) {
        let boot = host.boot(format!("config-{release}"));
        if boot.exists() {
            return read_config_file(&boot).map(|raw| parse_kconfig(&raw));
        }
        tried.push(boot);
    }

    Err(ProbeError::MissingKernelConfig {
        tried: tried
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn read_config_file(path: &Path) -> Result<String> {
    if path.extension().is_some_and(|ext| ext == "gz") {
        let file = fs::File::open(path).map_err(|e| ProbeError::io(path, e))?;
        let mut raw = String::new();
        GzDecoder::new(file)
            .read_to_string(&mut raw)
            .map_err(|e| ProbeError::io(path, e))?;
        return Ok(raw);
    }
    fs::read_to_string(path).map_err(|e| ProbeError::io(path, e))
}

/// Parse `CONFIG_X=v` lines into `X → v`; `y`/`m` become `true`.
fn parse_kconfig(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (name, value) = line.split_once('=')?;
            let name = name.strip_prefix("CONFIG_").unwrap_or(name);
            let value = match value.trim_matches('"') {
                "y" | "m" => ENABLED,
                other => other,
            };
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
