use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProbeError, Result};
use super::host::HostContext;
use super::{Rule, RuleKind};

/// Matches when any pattern finds a match in the node name.
///
/// Patterns are unanchored; use `^...$` to match the whole name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HostnameRule(pub Vec<String>);

impl Rule for HostnameRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Hostname
    }

    fn matches(&self, host: &HostContext) -> Result<bool> {
        for pattern in &self.0 {
            let re = Regex::new(pattern).map_err(|source| ProbeError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            if re.is_match(&host.node_name) {
                debug!(pattern = %pattern, node = %host.node_name, "hostname matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use nodefeat_core::config::HostPaths;

    use super::*;

    fn host(name: &str) -> HostContext {
        HostContext::new(name, HostPaths::default())
    }

    fn rule(patterns: &[&str]) -> HostnameRule {
        HostnameRule(patterns.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn any_pattern_matches() {
        let r = rule(&["^gpu-", "^node-a$"]);
        assert!(r.matches(&host("node-a")).unwrap());
        assert!(r.matches(&host("gpu-7")).unwrap());
        assert!(!r.matches(&host("node-b")).unwrap());
    }

    #[test]
    fn patterns_are_unanchored() {
        assert!(rule(&["worker"]).matches(&host("k8s-worker-3")).unwrap());
    }

    #[test]
    fn empty_pattern_list_never_matches() {
        assert!(!rule(&[]).matches(&host("anything")).unwrap());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = rule(&["node-(["]).matches(&host("node-a")).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidPattern { ref pattern, .. } if pattern == "node-(["));
    }
}
