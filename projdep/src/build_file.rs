// projdep/src/build_file.rs
//! JSON description of a multi-project build, loaded into a [`BuildTree`].
use std::fs;
use std::path::Path;
use std::sync::Arc;

use projdep_common::deprecation::DeprecationReporter;
use projdep_common::error::{ProjdepError, Result};
use projdep_common::model::{
    DependencyConstraint, DependencyState, ModuleDependency, ProjectPath, PublishArtifact,
};
use projdep_core::{BuildTree, Configuration, ConfigurationRole, Dependency, ProjectDependency};
use serde::Deserialize;
use tracing::debug;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFile {
    pub root_project: String,
    #[serde(default)]
    pub projects: Vec<ProjectSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub path: ProjectPath,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub configurations: Vec<ConfigurationSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub consumable: bool,
    #[serde(default = "default_true")]
    pub resolvable: bool,
    #[serde(default)]
    pub deprecated_for_consumption: Option<Vec<String>>,
    #[serde(default)]
    pub extends_from: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    #[serde(default)]
    pub constraints: Vec<DependencyConstraint>,
    #[serde(default)]
    pub artifacts: Vec<PublishArtifact>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Project(ProjectDependencySpec),
    Module(ModuleDependencySpec),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDependencySpec {
    pub project: ProjectPath,
    #[serde(default = "default_true")]
    pub build_project_dependencies: bool,
    #[serde(flatten)]
    pub state: DependencyState,
}

#[derive(Debug, Deserialize)]
pub struct ModuleDependencySpec {
    pub module: String,
    #[serde(flatten)]
    pub state: DependencyState,
}

impl BuildFile {
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Reading build description from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            ProjdepError::BuildFile(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ProjdepError::BuildFile(format!("Failed to parse build description: {e}")))
    }

    /// Creates every project first so project dependencies can point anywhere in the tree.
    pub fn into_tree(self, deprecations: Arc<DeprecationReporter>) -> Result<BuildTree> {
        let tree = BuildTree::new(self.root_project, deprecations);
        for spec in &self.projects {
            let project = if spec.path.is_root() {
                tree.root()
            } else {
                tree.add_project(&spec.path)?
            };
            if let Some(group) = &spec.group {
                project.set_group(group.clone());
            }
            if let Some(version) = &spec.version {
                project.set_version(version.clone());
            }
        }

        for spec in self.projects {
            let project = tree.project(&spec.path)?;
            for configuration in spec.configurations {
                let builder = configuration_builder(&tree, configuration)?;
                project.configurations().register(builder)?;
            }
        }
        debug!("Loaded build tree with {} project(s)", tree.projects().len());
        Ok(tree)
    }
}

fn configuration_builder(
    tree: &BuildTree,
    spec: ConfigurationSpec,
) -> Result<projdep_core::ConfigurationBuilder> {
    let mut roles = ConfigurationRole::DECLARABLE;
    roles.set(ConfigurationRole::CONSUMABLE, spec.consumable);
    roles.set(ConfigurationRole::RESOLVABLE, spec.resolvable);

    let mut builder = Configuration::builder(spec.name).roles(roles);
    if let Some(replacements) = spec.deprecated_for_consumption {
        builder = builder.deprecated_for_consumption(replacements);
    }
    for parent in spec.extends_from {
        builder = builder.extends_from(parent);
    }
    for dependency in spec.dependencies {
        builder = builder.dependency(dependency.into_dependency(tree)?);
    }
    for constraint in spec.constraints {
        builder = builder.constraint(constraint);
    }
    for artifact in spec.artifacts {
        builder = builder.artifact(artifact);
    }
    Ok(builder)
}

impl DependencySpec {
    fn into_dependency(self, tree: &BuildTree) -> Result<Dependency> {
        match self {
            Self::Project(spec) => {
                let target = tree.project(&spec.project)?;
                let mut edge = ProjectDependency::with_configuration(
                    &target,
                    spec.state.target_configuration.as_deref(),
                    spec.build_project_dependencies,
                );
                edge.set_transitive(spec.state.transitive);
                for (key, value) in spec.state.attributes.iter() {
                    edge.attribute(key, value);
                }
                for capability in spec.state.requested_capabilities {
                    edge.capability(capability);
                }
                for rule in spec.state.exclude_rules {
                    edge.exclude(rule);
                }
                Ok(Dependency::Project(edge))
            }
            Self::Module(spec) => {
                let mut module = ModuleDependency::parse(&spec.module).ok_or_else(|| {
                    ProjdepError::BuildFile(format!("Invalid module notation '{}'", spec.module))
                })?;
                module.state = spec.state;
                Ok(Dependency::Module(module))
            }
        }
    }
}
