//! Match algebra: AND within a [`MatchRule`], OR across alternatives.
//!
//! Both levels short-circuit. A probe error aborts evaluation of the whole
//! feature spec immediately; remaining alternatives are not tried.

use tracing::debug;

use crate::probes::{HostContext, ProbeError, Rule};
use crate::schema::{FeatureSpec, MatchRule};

/// Evaluate a feature spec against the host.
///
/// Returns `Ok(true)` as soon as one alternative fully matches.
pub fn evaluate(spec: &FeatureSpec, host: &HostContext) -> Result<bool, ProbeError> {
    match_any(spec.match_on.iter().map(MatchRule::rules), host)
}

/// OR over alternatives, each an AND over its rules, in iteration order.
///
/// An alternative with no rules matches.
pub fn match_any<'r, A, R>(alternatives: A, host: &HostContext) -> Result<bool, ProbeError>
where
    A: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'r dyn Rule>,
{
    for (index, alternative) in alternatives.into_iter().enumerate() {
        if match_all(alternative, host)? {
            debug!(alternative = index, "alternative matched");
            return Ok(true);
        }
    }
    Ok(false)
}

fn match_all<'r, R>(rules: R, host: &HostContext) -> Result<bool, ProbeError>
where
    R: IntoIterator<Item = &'r dyn Rule>,
{
    for rule in rules {
        debug!(rule = %rule.kind(), "evaluating rule");
        if !rule.matches(host)? {
            debug!(rule = %rule.kind(), "no match");
            return Ok(false);
        }
    }
    Ok(true)
}
