// projdep-core/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use projdep_common::config::WarningMode;
use projdep_common::deprecation::DeprecationReporter;
use projdep_common::model::{ModuleDependency, ProjectPath, PublishArtifact, TaskPath};
use projdep_core::{BuildTree, Dependency, Project};

pub fn tree() -> BuildTree {
    BuildTree::new("shop", Arc::new(DeprecationReporter::new(WarningMode::None)))
}

pub fn project(tree: &BuildTree, path: &str) -> Arc<Project> {
    tree.add_project(&ProjectPath::parse(path).unwrap()).unwrap()
}

pub fn module(notation: &str) -> Dependency {
    Dependency::Module(ModuleDependency::parse(notation).unwrap())
}

pub fn task(path: &str) -> TaskPath {
    TaskPath::parse(path).unwrap()
}

/// `<name>.jar` built by `<project>:<task>`.
pub fn jar(project: &Project, name: &str, task_name: &str) -> PublishArtifact {
    PublishArtifact::new(name, format!("{name}.jar"))
        .built_by(TaskPath::new(project.identity_path().clone(), task_name))
}
