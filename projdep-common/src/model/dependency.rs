// projdep-common/src/model/dependency.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeContainer, Capability, ExcludeRule};

fn default_transitive() -> bool {
    true
}

/// State shared by every kind of declared dependency: the requested configuration,
/// transitivity, attributes, capabilities and exclude rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyState {
    #[serde(default, alias = "configuration", skip_serializing_if = "Option::is_none")]
    pub target_configuration: Option<String>,
    #[serde(default = "default_transitive")]
    pub transitive: bool,
    #[serde(default, skip_serializing_if = "AttributeContainer::is_empty")]
    pub attributes: AttributeContainer,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_capabilities: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_rules: Vec<ExcludeRule>,
}

impl Default for DependencyState {
    fn default() -> Self {
        Self {
            target_configuration: None,
            transitive: true,
            attributes: AttributeContainer::default(),
            requested_capabilities: Vec::new(),
            exclude_rules: Vec::new(),
        }
    }
}

impl DependencyState {
    pub fn with_target_configuration(target_configuration: Option<String>) -> Self {
        Self {
            target_configuration,
            ..Self::default()
        }
    }

    /// Copies everything except the target configuration, which the copy was constructed with.
    pub fn copy_to(&self, target: &mut DependencyState) {
        target.transitive = self.transitive;
        target.attributes = self.attributes.clone();
        target.requested_capabilities = self.requested_capabilities.clone();
        target.exclude_rules = self.exclude_rules.clone();
    }

    /// Full comparison of the shared state, transitivity and exclude rules included.
    pub fn common_content_equals(&self, other: &DependencyState) -> bool {
        self == other
    }
}

/// A dependency on a module published outside this build, `group:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub group: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub state: DependencyState,
}

impl ModuleDependency {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.map(str::to_string),
            state: DependencyState::default(),
        }
    }

    /// Parses `group:name[:version]` notation.
    pub fn parse(notation: &str) -> Option<Self> {
        let mut parts = notation.split(':');
        let group = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;
        let version = parts.next().filter(|s| !s.is_empty());
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(group, name, version))
    }
}

impl fmt::Display for ModuleDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{}", self.group, self.name, v),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

/// A version constraint on a module that applies only if the module is otherwise part of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyConstraint {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DependencyConstraint {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            reason: None,
        }
    }
}

impl fmt::Display for DependencyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint {}:{}:{}", self.group, self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_defaults_to_transitive() {
        let state = DependencyState::default();
        assert!(state.transitive);
        assert!(state.target_configuration.is_none());

        let parsed: DependencyState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn copy_to_keeps_target_configuration() {
        let mut source = DependencyState::with_target_configuration(Some("api".into()));
        source.transitive = false;
        source.attributes.attribute("usage", "java-api");
        source.exclude_rules.push(ExcludeRule {
            group: Some("org.slf4j".into()),
            module: None,
        });

        let mut target = DependencyState::with_target_configuration(Some("runtime".into()));
        source.copy_to(&mut target);
        assert_eq!(target.target_configuration.as_deref(), Some("runtime"));
        assert!(!target.transitive);
        assert_eq!(target.attributes, source.attributes);
        assert_eq!(target.exclude_rules, source.exclude_rules);
    }

    #[test]
    fn module_notation() {
        let dep = ModuleDependency::parse("org.slf4j:slf4j-api:2.0.13").unwrap();
        assert_eq!(dep.group, "org.slf4j");
        assert_eq!(dep.to_string(), "org.slf4j:slf4j-api:2.0.13");
        assert_eq!(ModuleDependency::parse("g:n").unwrap().version, None);
        assert!(ModuleDependency::parse("g").is_none());
        assert!(ModuleDependency::parse("a:b:c:d").is_none());
    }
}
