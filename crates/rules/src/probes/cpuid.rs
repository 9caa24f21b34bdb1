use std::collections::HashSet;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProbeError, Result};
use super::host::HostContext;
use super::{Rule, RuleKind};

/// Matches when every listed CPU feature flag is present (case-insensitive).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CpuIdRule(pub Vec<String>);

impl Rule for CpuIdRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CpuId
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        let flags = cpu_flags(host)?;
        for flag in &self.0 {
            if !flags.contains(&flag.to_ascii_uppercase()) {
                debug!(flag = %flag, "cpu flag not present");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Flags of the first CPU listed in `cpuinfo`, upper-cased.
///
/// x86 reports them under `flags`, arm64 under `Features`.
fn cpu_flags(host: &HostContext) -> Result<HashSet<String>> {
    let path = host.procfs("cpuinfo");
    let contents = fs::read_to_string(&path).map_err(|e| ProbeError::io(&path, e))?;

    let line = contents.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        matches!(key.trim(), "flags" | "Features").then_some(value)
    });

    Ok(line
        .map(|value| value.split_whitespace().map(str::to_ascii_uppercase).collect())
        .unwrap_or_default())
}
