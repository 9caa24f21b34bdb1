use std::collections::HashSet;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProbeError, Result};
use super::host::HostContext;
use super::{Rule, RuleKind};

/// Matches when every listed kernel module is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LoadedKModRule(pub Vec<String>);

impl Rule for LoadedKModRule {
    fn kind(&self) -> RuleKind {
        RuleKind::LoadedKMod
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        let loaded = loaded_modules(host)?;
        for module in &self.0 {
            if !loaded.contains(module.as_str()) {
                debug!(module = %module, "kernel module not loaded");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn loaded_modules(host: &HostContext) -> Result<HashSet<String>> {
    let path = host.procfs("modules");
    let contents = fs::read_to_string(&path).map_err(|e| ProbeError::io(&path, e))?;
    Ok(contents
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect())
}
