// projdep-common/src/model/mod.rs
pub mod artifact;
pub mod attributes;
pub mod dependency;
pub mod path;

// Re-export
pub use artifact::PublishArtifact;
pub use attributes::{AttributeContainer, Capability, ExcludeRule};
pub use dependency::{DependencyConstraint, DependencyState, ModuleDependency};
pub use path::{ProjectPath, TaskPath};
