// projdep-core/src/project_dependency.rs
//! A dependency of one project on a configuration of another project in the same build.
//!
//! The edge keeps a non-owning handle to the target [`Project`] rather than a copy
//! of its coordinates: `group()`, `name()` and `version()` always read the producer's
//! current values, so a version bumped late in configuration is observed, and two
//! reads of the same edge may disagree if the producer changes in between.
//! The [`BuildTree`](crate::BuildTree) owns every project; once it is dropped the
//! handle no longer upgrades and lookups fail with `UnknownProject`.
//! Identity (`Eq`/`Hash`) is based on the producer's identity path, which does not
//! change.
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use projdep_common::config::DEFAULT_CONFIGURATION;
use projdep_common::deprecation::DeprecationNotice;
use projdep_common::error::{ProjdepError, Result};
use projdep_common::model::{
    AttributeContainer, Capability, DependencyState, ExcludeRule, ProjectPath,
};
use tracing::debug;

use crate::configuration::Configuration;
use crate::project::Project;
use crate::resolve_context::{self, CachingDependencyResolveContext, DependencyResolveContext};
use crate::resolver;
use crate::tasks::{self, TaskDependency};

/// Stands in for the configuration hash when no configuration was requested.
const ABSENT_CONFIGURATION_HASH: u64 = 31;

#[derive(Clone)]
pub struct ProjectDependency {
    project: Weak<Project>,
    identity_path: ProjectPath,
    build_project_dependencies: bool,
    state: DependencyState,
}

impl ProjectDependency {
    pub fn new(project: &Arc<Project>, build_project_dependencies: bool) -> Self {
        Self::with_configuration(project, None, build_project_dependencies)
    }

    pub fn with_configuration(
        project: &Arc<Project>,
        configuration: Option<&str>,
        build_project_dependencies: bool,
    ) -> Self {
        Self {
            project: Arc::downgrade(project),
            identity_path: project.identity_path().clone(),
            build_project_dependencies,
            state: DependencyState::with_target_configuration(configuration.map(str::to_string)),
        }
    }

    /// The producer, as long as the build tree that owns it is alive.
    pub fn dependency_project(&self) -> Result<Arc<Project>> {
        self.project
            .upgrade()
            .ok_or_else(|| ProjdepError::UnknownProject(self.identity_path.to_string()))
    }

    pub fn group(&self) -> Result<String> {
        Ok(self.dependency_project()?.group())
    }

    pub fn name(&self) -> Result<String> {
        Ok(self.dependency_project()?.name())
    }

    pub fn version(&self) -> Result<String> {
        Ok(self.dependency_project()?.version())
    }

    pub fn identity_path(&self) -> &ProjectPath {
        &self.identity_path
    }

    pub fn target_configuration(&self) -> Option<&str> {
        self.state.target_configuration.as_deref()
    }

    /// Whether consuming this edge requires the producer's tasks to run.
    pub fn build_project_dependencies(&self) -> bool {
        self.build_project_dependencies
    }

    pub fn state(&self) -> &DependencyState {
        &self.state
    }

    pub fn is_transitive(&self) -> bool {
        self.state.transitive
    }

    pub fn set_transitive(&mut self, transitive: bool) -> &mut Self {
        self.state.transitive = transitive;
        self
    }

    pub fn attributes(&self) -> &AttributeContainer {
        &self.state.attributes
    }

    pub fn attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.state.attributes.attribute(key, value);
        self
    }

    pub fn requested_capabilities(&self) -> &[Capability] {
        &self.state.requested_capabilities
    }

    pub fn capability(&mut self, capability: Capability) -> &mut Self {
        self.state.requested_capabilities.push(capability);
        self
    }

    pub fn exclude_rules(&self) -> &[ExcludeRule] {
        &self.state.exclude_rules
    }

    pub fn exclude(&mut self, rule: ExcludeRule) -> &mut Self {
        self.state.exclude_rules.push(rule);
        self
    }

    /// New edge to the same project and configuration, then the shared state copied over.
    pub fn copy(&self) -> Self {
        let mut copied = Self {
            project: Weak::clone(&self.project),
            identity_path: self.identity_path.clone(),
            build_project_dependencies: self.build_project_dependencies,
            state: DependencyState::with_target_configuration(
                self.state.target_configuration.clone(),
            ),
        };
        self.state.copy_to(&mut copied.state);
        copied
    }

    /// Looks up the targeted configuration on the producer and checks it may be consumed.
    pub fn find_project_configuration(&self) -> Result<Arc<Configuration>> {
        resolver::find_project_configuration(self)
    }

    /// Adds the target configuration's dependencies and constraints to `context`
    /// when both this edge and the context are transitive.
    pub fn expand_into(&self, context: &mut dyn DependencyResolveContext) -> Result<()> {
        resolve_context::expand_into(self, context)
    }

    /// Lazily computed tasks that must run before this edge's artifacts are usable.
    pub fn task_dependencies(&self) -> TaskDependency {
        tasks::project_task_dependencies(self)
    }

    /// Legacy entry point; prefer resolving a configuration that declares this dependency.
    #[deprecated(note = "add the dependency to a resolvable configuration and resolve that")]
    #[allow(deprecated)]
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        self.resolve_files(true)
    }

    #[deprecated(note = "add the dependency to a resolvable configuration and resolve that")]
    pub fn resolve_files(&self, transitive: bool) -> Result<Vec<PathBuf>> {
        self.dependency_project()?
            .deprecations()
            .report(DeprecationNotice::direct_project_dependency_resolution());

        let mut context = CachingDependencyResolveContext::new(transitive);
        context.add_dependency(self.clone().into());
        let closure = context.resolve()?;
        debug!(
            "Resolved {} file(s) directly from {}",
            closure.files.len(),
            self
        );
        Ok(closure.files)
    }

    #[deprecated(note = "use a resolvable configuration to track task dependencies")]
    pub fn build_dependencies(&self) -> Result<TaskDependency> {
        self.dependency_project()?
            .deprecations()
            .report(DeprecationNotice::project_dependency_build_dependencies());
        Ok(self.task_dependencies())
    }

    /// Stricter than `==`: also compares transitivity and exclude rules.
    pub fn content_equals(&self, other: &ProjectDependency) -> bool {
        std::ptr::eq(self, other)
            || (self.state.common_content_equals(&other.state)
                && self.identity_path() == other.identity_path())
    }

    /// XOR of the identity path hash, the configuration name hash and the build flag.
    pub fn content_hash(&self) -> u64 {
        let configuration = self
            .target_configuration()
            .map_or(ABSENT_CONFIGURATION_HASH, hash_of);
        hash_of(self.identity_path())
            ^ configuration
            ^ u64::from(self.build_project_dependencies)
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// Identity excludes transitivity and exclude rules.
impl PartialEq for ProjectDependency {
    fn eq(&self, other: &Self) -> bool {
        self.identity_path() == other.identity_path()
            && self.state.target_configuration == other.state.target_configuration
            && self.build_project_dependencies == other.build_project_dependencies
            && self.state.attributes == other.state.attributes
            && self.state.requested_capabilities == other.state.requested_capabilities
    }
}

impl Eq for ProjectDependency {}

impl Hash for ProjectDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl fmt::Display for ProjectDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProjectDependency{{identityPath='{}', configuration='{}'}}",
            self.identity_path(),
            self.target_configuration().unwrap_or(DEFAULT_CONFIGURATION)
        )
    }
}

impl fmt::Debug for ProjectDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectDependency")
            .field("identity_path", self.identity_path())
            .field("build_project_dependencies", &self.build_project_dependencies)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use projdep_common::deprecation::DeprecationReporter;

    use super::*;
    use crate::project::BuildTree;

    fn tree() -> BuildTree {
        BuildTree::new("shop", Arc::new(DeprecationReporter::default()))
    }

    fn lib(tree: &BuildTree) -> Arc<Project> {
        tree.add_project(&ProjectPath::parse(":lib").unwrap()).unwrap()
    }

    #[test]
    fn coordinates_are_read_through() {
        let tree = tree();
        let project = lib(&tree);
        project.set_group("org.example");
        project.set_version("1.0");
        let dep = ProjectDependency::new(&project, true);
        assert_eq!(dep.group().unwrap(), "org.example");
        assert_eq!(dep.name().unwrap(), "lib");
        assert_eq!(dep.version().unwrap(), "1.0");

        project.set_version("2.0");
        assert_eq!(dep.version().unwrap(), "2.0");
    }

    #[test]
    fn equality_ignores_transitivity_and_excludes() {
        let tree = tree();
        let project = lib(&tree);
        let a = ProjectDependency::with_configuration(&project, Some("api"), true);
        let mut b = ProjectDependency::with_configuration(&project, Some("api"), true);
        b.set_transitive(false).exclude(ExcludeRule {
            group: Some("org.slf4j".into()),
            module: None,
        });

        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
        assert!(!a.content_equals(&b));
        assert!(a.content_equals(&a.copy()));
    }

    #[test]
    fn equality_uses_path_not_instance() {
        // two separate trees model a reload: different objects, same identity path
        let (first_tree, second_tree) = (tree(), tree());
        let first = ProjectDependency::new(&lib(&first_tree), false);
        let second = ProjectDependency::new(&lib(&second_tree), false);
        assert!(!Arc::ptr_eq(
            &first.dependency_project().unwrap(),
            &second.dependency_project().unwrap()
        ));
        assert_eq!(first, second);

        let set: HashSet<_> = [first, second].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn identity_fields_break_equality() {
        let tree = tree();
        let project = lib(&tree);
        let base = ProjectDependency::new(&project, true);

        let explicit_default =
            ProjectDependency::with_configuration(&project, Some("default"), true);
        assert_ne!(base, explicit_default);

        assert_ne!(base, ProjectDependency::new(&project, false));

        let mut with_attribute = base.copy();
        with_attribute.attribute("usage", "java-runtime");
        assert_ne!(base, with_attribute);

        let mut with_capability = base.copy();
        with_capability.capability(Capability::new("org.example", "lib-test-fixtures"));
        assert_ne!(base, with_capability);

        let other = tree.add_project(&ProjectPath::parse(":app").unwrap()).unwrap();
        assert_ne!(base, ProjectDependency::new(&other, true));
    }

    #[test]
    fn hash_combines_with_xor() {
        let tree = tree();
        let project = lib(&tree);
        let absent = ProjectDependency::new(&project, false);
        assert_eq!(
            absent.content_hash(),
            hash_of(project.identity_path()) ^ ABSENT_CONFIGURATION_HASH
        );

        let built = ProjectDependency::with_configuration(&project, Some("api"), true);
        assert_eq!(
            built.content_hash(),
            hash_of(project.identity_path()) ^ hash_of("api") ^ 1
        );
    }

    #[test]
    fn copy_is_a_distinct_equal_value() {
        let tree = tree();
        let mut original =
            ProjectDependency::with_configuration(&lib(&tree), Some("runtimeElements"), true);
        original
            .set_transitive(false)
            .attribute("usage", "java-runtime")
            .capability(Capability::new("org.example", "lib"));

        let mut copied = original.copy();
        assert_eq!(copied, original);
        assert!(copied.content_equals(&original));
        assert!(!copied.is_transitive());

        copied.attribute("category", "library");
        assert_ne!(copied, original);
    }

    #[test]
    fn display_falls_back_to_default_configuration() {
        let tree = tree();
        let project = lib(&tree);
        assert_eq!(
            ProjectDependency::new(&project, true).to_string(),
            "ProjectDependency{identityPath=':lib', configuration='default'}"
        );
        assert_eq!(
            ProjectDependency::with_configuration(&project, Some("apiElements"), true).to_string(),
            "ProjectDependency{identityPath=':lib', configuration='apiElements'}"
        );
    }

    #[test]
    fn edge_does_not_keep_the_producer_alive() {
        let tree = tree();
        let project = lib(&tree);
        let weak = Arc::downgrade(&project);
        let edge = ProjectDependency::with_configuration(&project, Some("api"), true);
        drop(project);
        assert!(edge.dependency_project().is_ok());

        drop(tree);
        assert!(weak.upgrade().is_none());
        assert!(matches!(
            edge.dependency_project(),
            Err(ProjdepError::UnknownProject(ref p)) if p == ":lib"
        ));
        assert!(edge.version().is_err());
        assert_eq!(
            edge.to_string(),
            "ProjectDependency{identityPath=':lib', configuration='api'}"
        );
    }
}
