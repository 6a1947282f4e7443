//! Dependency force rules.
//!
//! Pins every dependency of a group (or one artifact of it) to a single
//! version across the workspace.

use std::fmt;

use serde::Serialize;

use retarget_core::manifest::ForceRule;
use retarget_core::module::Module;

/// `group:artifact:version` split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate<'a> {
    pub group: &'a str,
    pub artifact: &'a str,
    pub version: &'a str,
}

impl<'a> Coordinate<'a> {
    pub fn parse(s: &'a str) -> Option<Self> {
        let mut parts = s.split(':');
        let (group, artifact, version) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || group.is_empty() || artifact.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            group,
            artifact,
            version,
        })
    }
}

/// A dependency whose declared version a rule overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedDependency {
    pub module: String,
    /// Key under `[dependencies]`.
    pub key: String,
    pub group: String,
    pub artifact: String,
    pub requested: String,
    pub forced: String,
}

impl ForcedDependency {
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.forced)
    }
}

impl fmt::Display for ForcedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} -> {}",
            self.group, self.artifact, self.requested, self.forced
        )
    }
}

/// The rule governing `group:artifact`.
///
/// An artifact-specific rule beats a group-wide one; between rules of the
/// same specificity the first declared wins.
pub fn matching_rule<'r>(rules: &'r [ForceRule], group: &str, artifact: &str) -> Option<&'r ForceRule> {
    rules
        .iter()
        .find(|r| r.group == group && r.artifact.as_deref() == Some(artifact))
        .or_else(|| rules.iter().find(|r| r.group == group && r.artifact.is_none()))
}

/// Dependencies of `module` whose version `rules` would change.
pub fn forced_dependencies(module: &Module, rules: &[ForceRule]) -> Vec<ForcedDependency> {
    if rules.is_empty() {
        return Vec::new();
    }
    let mut forced = Vec::new();
    for (key, spec) in &module.dependencies {
        let Some(coord) = Coordinate::parse(spec) else {
            tracing::debug!(module = %module.name, dependency = %key, "skipping non-coordinate dependency");
            continue;
        };
        let Some(rule) = matching_rule(rules, coord.group, coord.artifact) else {
            continue;
        };
        if rule.version != coord.version {
            forced.push(ForcedDependency {
                module: module.name.clone(),
                key: key.clone(),
                group: coord.group.to_string(),
                artifact: coord.artifact.to_string(),
                requested: coord.version.to_string(),
                forced: rule.version.clone(),
            });
        }
    }
    forced
}

/// Rewrite `module`'s dependency specs to their forced versions.
pub fn apply_forced(module: &mut Module, forced: &[ForcedDependency]) {
    for dep in forced.iter().filter(|d| d.module == module.name) {
        if let Some(spec) = module.dependencies.get_mut(&dep.key) {
            *spec = dep.coordinate();
        }
    }
}
