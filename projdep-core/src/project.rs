// projdep-core/src/project.rs
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use projdep_common::deprecation::DeprecationReporter;
use projdep_common::error::{ProjdepError, Result};
use projdep_common::model::ProjectPath;
use tracing::debug;

use crate::configuration::ConfigurationContainer;

const UNSPECIFIED_VERSION: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Coordinates {
    group: String,
    name: String,
    version: String,
}

/// A build unit of the tree. Group, name and version stay mutable while the build is
/// being configured; readers must not cache them.
#[derive(Debug)]
pub struct Project {
    identity_path: ProjectPath,
    coordinates: RwLock<Coordinates>,
    configurations: ConfigurationContainer,
    deprecations: Arc<DeprecationReporter>,
}

impl Project {
    fn new(identity_path: ProjectPath, name: String, deprecations: Arc<DeprecationReporter>) -> Self {
        let display_name = display_name(&identity_path, &name);
        Self {
            configurations: ConfigurationContainer::new(identity_path.clone(), display_name),
            identity_path,
            coordinates: RwLock::new(Coordinates {
                group: String::new(),
                name,
                version: UNSPECIFIED_VERSION.to_string(),
            }),
            deprecations,
        }
    }

    pub fn identity_path(&self) -> &ProjectPath {
        &self.identity_path
    }

    pub fn display_name(&self) -> String {
        display_name(&self.identity_path, &self.name())
    }

    pub fn group(&self) -> String {
        self.read().group.clone()
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn version(&self) -> String {
        self.read().version.clone()
    }

    pub fn set_group(&self, group: impl Into<String>) {
        self.write().group = group.into();
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.write().name = name.into();
    }

    pub fn set_version(&self, version: impl Into<String>) {
        self.write().version = version.into();
    }

    pub fn configurations(&self) -> &ConfigurationContainer {
        &self.configurations
    }

    pub fn deprecations(&self) -> &DeprecationReporter {
        &self.deprecations
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Coordinates> {
        self.coordinates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Coordinates> {
        self.coordinates.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn display_name(path: &ProjectPath, name: &str) -> String {
    if path.is_root() {
        format!("root project '{name}'")
    } else {
        format!("project '{path}'")
    }
}

/// All projects of one build, keyed by identity path.
#[derive(Debug)]
pub struct BuildTree {
    root: Arc<Project>,
    projects: RwLock<BTreeMap<ProjectPath, Arc<Project>>>,
    deprecations: Arc<DeprecationReporter>,
}

impl BuildTree {
    pub fn new(root_name: impl Into<String>, deprecations: Arc<DeprecationReporter>) -> Self {
        let root = Arc::new(Project::new(
            ProjectPath::root(),
            root_name.into(),
            Arc::clone(&deprecations),
        ));
        let mut projects = BTreeMap::new();
        projects.insert(ProjectPath::root(), Arc::clone(&root));
        Self {
            root,
            projects: RwLock::new(projects),
            deprecations,
        }
    }

    /// Adds a project below the root. Missing intermediate projects are created too.
    pub fn add_project(&self, path: &ProjectPath) -> Result<Arc<Project>> {
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = projects.get(path) {
            return Ok(Arc::clone(existing));
        }

        let mut missing = vec![path.clone()];
        let mut cursor = path.parent();
        while let Some(parent) = cursor {
            if projects.contains_key(&parent) {
                break;
            }
            cursor = parent.parent();
            missing.push(parent);
        }

        let mut created = None;
        for project_path in missing.into_iter().rev() {
            let name = project_path
                .name()
                .ok_or_else(|| ProjdepError::InvalidPath(project_path.to_string()))?
                .to_string();
            debug!("Adding project {} to the build tree", project_path);
            let project = Arc::new(Project::new(
                project_path.clone(),
                name,
                Arc::clone(&self.deprecations),
            ));
            projects.insert(project_path, Arc::clone(&project));
            created = Some(project);
        }
        created.ok_or_else(|| ProjdepError::InvalidPath(path.to_string()))
    }

    pub fn project(&self, path: &ProjectPath) -> Result<Arc<Project>> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| ProjdepError::UnknownProject(path.to_string()))
    }

    pub fn root(&self) -> Arc<Project> {
        Arc::clone(&self.root)
    }

    /// Projects ordered by path, root first.
    pub fn projects(&self) -> Vec<Arc<Project>> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn deprecations(&self) -> &Arc<DeprecationReporter> {
        &self.deprecations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> BuildTree {
        BuildTree::new("shop", Arc::new(DeprecationReporter::default()))
    }

    #[test]
    fn display_names() {
        let tree = tree();
        assert_eq!(tree.root().display_name(), "root project 'shop'");
        let lib = tree.add_project(&ProjectPath::parse(":libs:core").unwrap()).unwrap();
        assert_eq!(lib.display_name(), "project ':libs:core'");
        assert_eq!(lib.name(), "core");
        assert_eq!(lib.version(), "unspecified");
    }

    #[test]
    fn intermediate_projects_are_created() {
        let tree = tree();
        tree.add_project(&ProjectPath::parse(":libs:core").unwrap()).unwrap();
        let paths: Vec<_> = tree
            .projects()
            .iter()
            .map(|p| p.identity_path().to_string())
            .collect();
        assert_eq!(paths, vec![":", ":libs", ":libs:core"]);
    }

    #[test]
    fn adding_twice_returns_same_project() {
        let tree = tree();
        let path = ProjectPath::parse(":app").unwrap();
        let first = tree.add_project(&path).unwrap();
        let second = tree.add_project(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_project() {
        let err = tree().project(&ProjectPath::parse(":nope").unwrap()).unwrap_err();
        assert!(matches!(err, ProjdepError::UnknownProject(ref p) if p == ":nope"));
    }

    #[test]
    fn coordinates_are_live() {
        let tree = tree();
        let app = tree.add_project(&ProjectPath::parse(":app").unwrap()).unwrap();
        app.set_group("org.example");
        app.set_version("1.0");
        assert_eq!(app.group(), "org.example");
        app.set_version("1.1-SNAPSHOT");
        assert_eq!(app.version(), "1.1-SNAPSHOT");
    }
}
