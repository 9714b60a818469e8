// projdep-core/src/resolve_context.rs
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use projdep_common::error::Result;
use projdep_common::model::{DependencyConstraint, ExcludeRule};
use tracing::{debug, trace};

use crate::configuration::Configuration;
use crate::dependency::Dependency;
use crate::project_dependency::ProjectDependency;

/// Accumulates dependencies and constraints while a dependency closure is walked.
pub trait DependencyResolveContext {
    /// Whether the caller wants transitive dependencies pulled in.
    fn is_transitive(&self) -> bool;

    fn add_dependency(&mut self, dependency: Dependency);

    fn add_constraint(&mut self, constraint: DependencyConstraint);
}

/// Adds what the edge's target configuration declares, one level deep. Going
/// further is up to the context, which sees the added project edges again.
pub(crate) fn expand_into(
    dependency: &ProjectDependency,
    context: &mut dyn DependencyResolveContext,
) -> Result<()> {
    if !expands(dependency, context) {
        return Ok(());
    }
    let configuration = dependency.find_project_configuration()?;
    add_declared(dependency, &configuration, context)
}

/// [`expand_into`] for a target configuration the caller has already selected.
pub(crate) fn expand_resolved(
    dependency: &ProjectDependency,
    configuration: &Arc<Configuration>,
    context: &mut dyn DependencyResolveContext,
) -> Result<()> {
    if !expands(dependency, context) {
        return Ok(());
    }
    add_declared(dependency, configuration, context)
}

fn expands(dependency: &ProjectDependency, context: &dyn DependencyResolveContext) -> bool {
    let expands = dependency.is_transitive() && context.is_transitive();
    if !expands {
        trace!("{} is a closure leaf", dependency);
    }
    expands
}

fn add_declared(
    dependency: &ProjectDependency,
    configuration: &Arc<Configuration>,
    context: &mut dyn DependencyResolveContext,
) -> Result<()> {
    let project = dependency.dependency_project()?;
    let configurations = project.configurations();
    for declared in configurations.all_dependencies(configuration)? {
        context.add_dependency(declared);
    }
    for constraint in configurations.all_dependency_constraints(configuration)? {
        context.add_constraint(constraint);
    }
    Ok(())
}

/// Everything reached from the seeded dependencies, in the order first reached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedClosure {
    pub dependencies: Vec<Dependency>,
    pub constraints: Vec<DependencyConstraint>,
    /// Artifact files published by the project configurations that were reached.
    pub files: Vec<PathBuf>,
}

/// Walks a dependency closure breadth first, expanding project edges as they are reached.
/// Exclude rules of an edge drop matching dependencies anywhere below it.
/// Module dependencies are recorded but not resolved; that needs a repository.
#[derive(Debug)]
pub struct CachingDependencyResolveContext {
    transitive: bool,
    queue: VecDeque<(Dependency, Vec<ExcludeRule>)>,
    constraints: Vec<DependencyConstraint>,
}

impl CachingDependencyResolveContext {
    pub fn new(transitive: bool) -> Self {
        Self {
            transitive,
            queue: VecDeque::new(),
            constraints: Vec::new(),
        }
    }

    pub fn resolve(mut self) -> Result<ResolvedClosure> {
        let mut closure = ResolvedClosure::default();
        while let Some((dependency, mut excludes)) = self.queue.pop_front() {
            if closure.dependencies.contains(&dependency) {
                continue;
            }
            match &dependency {
                Dependency::Project(edge) => {
                    let configuration = edge.find_project_configuration()?;
                    let artifacts = edge
                        .dependency_project()?
                        .configurations()
                        .all_artifacts(&configuration)?;
                    for artifact in artifacts {
                        if !closure.files.contains(&artifact.file) {
                            closure.files.push(artifact.file);
                        }
                    }
                    for rule in edge.exclude_rules() {
                        if !excludes.contains(rule) {
                            excludes.push(rule.clone());
                        }
                    }
                    let mut below = ExcludingContext {
                        walk: &mut self,
                        excludes,
                    };
                    expand_resolved(edge, &configuration, &mut below)?;
                }
                Dependency::Module(module) => {
                    trace!("{} is resolved outside of this build", module);
                }
            }
            closure.dependencies.push(dependency);
        }
        closure.constraints = self.constraints;
        debug!(
            "Closure holds {} dependencies, {} constraints and {} files",
            closure.dependencies.len(),
            closure.constraints.len(),
            closure.files.len()
        );
        Ok(closure)
    }
}

impl DependencyResolveContext for CachingDependencyResolveContext {
    fn is_transitive(&self) -> bool {
        self.transitive
    }

    fn add_dependency(&mut self, dependency: Dependency) {
        self.queue.push_back((dependency, Vec::new()));
    }

    fn add_constraint(&mut self, constraint: DependencyConstraint) {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
    }
}

/// Feeds one edge's expansion into the walk under the exclude rules in force there.
struct ExcludingContext<'a> {
    walk: &'a mut CachingDependencyResolveContext,
    excludes: Vec<ExcludeRule>,
}

impl DependencyResolveContext for ExcludingContext<'_> {
    fn is_transitive(&self) -> bool {
        self.walk.transitive
    }

    fn add_dependency(&mut self, dependency: Dependency) {
        if dependency.is_excluded_by(&self.excludes) {
            trace!("{} is excluded", dependency);
            return;
        }
        self.walk
            .queue
            .push_back((dependency, self.excludes.clone()));
    }

    fn add_constraint(&mut self, constraint: DependencyConstraint) {
        self.walk.add_constraint(constraint);
    }
}
