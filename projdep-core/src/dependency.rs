// projdep-core/src/dependency.rs
use std::fmt;

use projdep_common::model::{DependencyState, ExcludeRule, ModuleDependency};

use crate::project_dependency::ProjectDependency;

/// A dependency declared on a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    Module(ModuleDependency),
    Project(ProjectDependency),
}

impl Dependency {
    pub fn state(&self) -> &DependencyState {
        match self {
            Self::Module(module) => &module.state,
            Self::Project(project) => project.state(),
        }
    }

    pub fn is_transitive(&self) -> bool {
        self.state().transitive
    }

    /// Matches modules by group and name, project edges by the producer's current
    /// group and name. An edge whose producer is gone matches nothing.
    pub fn is_excluded_by(&self, rules: &[ExcludeRule]) -> bool {
        let (group, name) = match self {
            Self::Module(module) => (module.group.clone(), module.name.clone()),
            Self::Project(project) => match (project.group(), project.name()) {
                (Ok(group), Ok(name)) => (group, name),
                _ => return false,
            },
        };
        rules.iter().any(|rule| rule.matches(&group, &name))
    }

    pub fn as_project(&self) -> Option<&ProjectDependency> {
        match self {
            Self::Project(project) => Some(project),
            Self::Module(_) => None,
        }
    }
}

impl From<ModuleDependency> for Dependency {
    fn from(module: ModuleDependency) -> Self {
        Self::Module(module)
    }
}

impl From<ProjectDependency> for Dependency {
    fn from(project: ProjectDependency) -> Self {
        Self::Project(project)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(module) => write!(f, "{module}"),
            Self::Project(project) => write!(f, "{project}"),
        }
    }
}
