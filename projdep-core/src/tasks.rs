// projdep-core/src/tasks.rs
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use projdep_common::error::Result;
use projdep_common::model::{ProjectPath, PublishArtifact, TaskPath};
use tracing::{debug, trace};

use crate::configuration::Configuration;
use crate::project::Project;
use crate::project_dependency::ProjectDependency;

/// Something that may carry task dependencies.
#[derive(Clone)]
pub enum BuildNode {
    Task(TaskPath),
    Artifact(PublishArtifact),
    /// A configuration needs the build dependencies of the project edges it declares.
    Configuration {
        project: Arc<Project>,
        configuration: Arc<Configuration>,
    },
    Dependency(TaskDependency),
}

impl BuildNode {
    pub fn configuration(project: Arc<Project>, configuration: Arc<Configuration>) -> Self {
        Self::Configuration {
            project,
            configuration,
        }
    }
}

impl fmt::Debug for BuildNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(task) => write!(f, "Task({task})"),
            Self::Artifact(artifact) => write!(f, "Artifact({artifact})"),
            Self::Configuration { configuration, .. } => write!(
                f,
                "Configuration({}:{})",
                configuration.owner(),
                configuration.name()
            ),
            Self::Dependency(_) => f.write_str("Dependency(..)"),
        }
    }
}

/// Receives the nodes a [`TaskDependencyContainer`] depends on.
pub trait TaskDependencyResolveContext {
    fn add(&mut self, node: BuildNode);
}

pub trait TaskDependencyContainer {
    fn visit_dependencies(&self, context: &mut dyn TaskDependencyResolveContext) -> Result<()>;
}

type Visitor = dyn Fn(&mut dyn TaskDependencyResolveContext) -> Result<()> + Send + Sync;

/// A task dependency computed by a visitor when, and each time, it is queried.
/// Nothing is cached between queries.
#[derive(Clone)]
pub struct TaskDependency {
    visitor: Arc<Visitor>,
}

impl TaskDependency {
    pub fn visiting<F>(visitor: F) -> Self
    where
        F: Fn(&mut dyn TaskDependencyResolveContext) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            visitor: Arc::new(visitor),
        }
    }

    pub fn empty() -> Self {
        Self::visiting(|_| Ok(()))
    }

    /// Resolves the visitor and everything it reaches into task paths.
    pub fn get_dependencies(&self) -> Result<BTreeSet<TaskPath>> {
        let mut context = CachingTaskDependencyResolveContext::new();
        context.add(BuildNode::Dependency(self.clone()));
        context.resolve()
    }
}

impl TaskDependencyContainer for TaskDependency {
    fn visit_dependencies(&self, context: &mut dyn TaskDependencyResolveContext) -> Result<()> {
        (self.visitor)(context)
    }
}

impl fmt::Debug for TaskDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TaskDependency(..)")
    }
}

pub(crate) fn project_task_dependencies(dependency: &ProjectDependency) -> TaskDependency {
    let dependency = dependency.clone();
    TaskDependency::visiting(move |context| {
        if !dependency.build_project_dependencies() {
            trace!("{} does not build its project", dependency);
            return Ok(());
        }
        let project = dependency.dependency_project()?;
        let configuration = dependency.find_project_configuration()?;
        let artifacts = project.configurations().all_artifacts(&configuration)?;
        context.add(BuildNode::configuration(project, configuration));
        for artifact in artifacts {
            context.add(BuildNode::Artifact(artifact));
        }
        Ok(())
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeKey {
    Task(TaskPath),
    Artifact(PublishArtifact),
    Configuration(ProjectPath, String),
}

/// Expands build nodes into the set of tasks they need, visiting each task, artifact
/// and configuration once.
#[derive(Debug, Default)]
pub struct CachingTaskDependencyResolveContext {
    queue: VecDeque<BuildNode>,
    seen: HashSet<NodeKey>,
    tasks: BTreeSet<TaskPath>,
}

impl CachingTaskDependencyResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(mut self) -> Result<BTreeSet<TaskPath>> {
        while let Some(node) = self.queue.pop_front() {
            match node {
                BuildNode::Task(task) => {
                    if self.seen.insert(NodeKey::Task(task.clone())) {
                        self.tasks.insert(task);
                    }
                }
                BuildNode::Artifact(artifact) => {
                    if self.seen.insert(NodeKey::Artifact(artifact.clone())) {
                        for task in artifact.built_by {
                            self.queue.push_back(BuildNode::Task(task));
                        }
                    }
                }
                BuildNode::Configuration {
                    project,
                    configuration,
                } => {
                    let key = NodeKey::Configuration(
                        configuration.owner().clone(),
                        configuration.name().to_string(),
                    );
                    if !self.seen.insert(key) {
                        continue;
                    }
                    for dependency in project.configurations().all_dependencies(&configuration)? {
                        if let Some(edge) = dependency.as_project() {
                            self.queue
                                .push_back(BuildNode::Dependency(edge.task_dependencies()));
                        }
                    }
                }
                BuildNode::Dependency(dependency) => dependency.visit_dependencies(&mut self)?,
            }
        }
        debug!("Resolved {} task dependencies", self.tasks.len());
        Ok(self.tasks)
    }
}

impl TaskDependencyResolveContext for CachingTaskDependencyResolveContext {
    fn add(&mut self, node: BuildNode) {
        self.queue.push_back(node);
    }
}

#[cfg(test)]
mod tests {
    use projdep_common::deprecation::DeprecationReporter;

    use super::*;
    use crate::project::BuildTree;

    #[derive(Default)]
    struct Recording(Vec<BuildNode>);

    impl TaskDependencyResolveContext for Recording {
        fn add(&mut self, node: BuildNode) {
            self.0.push(node);
        }
    }

    fn task(path: &str) -> TaskPath {
        TaskPath::parse(path).unwrap()
    }

    fn setup() -> (BuildTree, Arc<Project>) {
        let tree = BuildTree::new("shop", Arc::new(DeprecationReporter::default()));
        let lib = tree.add_project(&ProjectPath::parse(":lib").unwrap()).unwrap();
        lib.configurations()
            .register(
                Configuration::builder("default")
                    .artifact(PublishArtifact::new("lib", "lib.jar").built_by(task(":lib:jar")))
                    .artifact(
                        PublishArtifact::new("lib-sources", "lib-sources.jar")
                            .built_by(task(":lib:sourcesJar")),
                    ),
            )
            .unwrap();
        (tree, lib)
    }

    #[test]
    fn empty_dependency() {
        assert!(TaskDependency::empty().get_dependencies().unwrap().is_empty());
    }

    #[test]
    fn visitor_adds_configuration_and_artifacts() {
        let (_tree, lib) = setup();
        let edge = ProjectDependency::new(&lib, true);
        let mut recording = Recording::default();
        edge.task_dependencies()
            .visit_dependencies(&mut recording)
            .unwrap();

        assert_eq!(recording.0.len(), 3);
        assert!(matches!(
            &recording.0[0],
            BuildNode::Configuration { configuration, .. } if configuration.name() == "default"
        ));
        assert!(matches!(&recording.0[1], BuildNode::Artifact(a) if a.name == "lib"));
        assert!(matches!(&recording.0[2], BuildNode::Artifact(a) if a.name == "lib-sources"));
    }

    #[test]
    fn artifacts_resolve_to_their_tasks() {
        let (_tree, lib) = setup();
        let tasks = ProjectDependency::new(&lib, true)
            .task_dependencies()
            .get_dependencies()
            .unwrap();
        assert_eq!(
            tasks.into_iter().collect::<Vec<_>>(),
            vec![task(":lib:jar"), task(":lib:sourcesJar")]
        );
    }

    #[test]
    fn metadata_only_edge_contributes_nothing() {
        let (_tree, lib) = setup();
        let edge = ProjectDependency::new(&lib, false);
        let mut recording = Recording::default();
        edge.task_dependencies()
            .visit_dependencies(&mut recording)
            .unwrap();
        assert!(recording.0.is_empty());
        assert!(edge.task_dependencies().get_dependencies().unwrap().is_empty());
    }

    #[test]
    fn construction_does_not_resolve() {
        let (tree, lib) = setup();
        lib.configurations()
            .register(Configuration::builder("compile").deprecated_for_consumption(["apiElements"]))
            .unwrap();
        let edge = ProjectDependency::with_configuration(&lib, Some("compile"), true);

        let dependency = edge.task_dependencies();
        assert_eq!(tree.deprecations().count(), 0);
        dependency.get_dependencies().unwrap();
        dependency.get_dependencies().unwrap();
        assert_eq!(tree.deprecations().count(), 2);
    }
}
