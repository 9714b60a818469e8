// projdep-core/src/lib.rs
pub mod configuration;
pub mod dependency;
pub mod project;
pub mod project_dependency;
pub mod resolve_context;
pub mod resolver;
pub mod tasks;

// Re-export key types
pub use configuration::{Configuration, ConfigurationBuilder, ConfigurationContainer, ConfigurationRole};
pub use dependency::Dependency;
pub use project::{BuildTree, Project};
pub use project_dependency::ProjectDependency;
pub use resolve_context::{CachingDependencyResolveContext, DependencyResolveContext, ResolvedClosure};
pub use tasks::{
    BuildNode, CachingTaskDependencyResolveContext, TaskDependency, TaskDependencyContainer,
    TaskDependencyResolveContext,
};
