// projdep/src/cli/closure.rs
use clap::Args;
use colored::Colorize;
use projdep_common::error::Result;
use projdep_core::{BuildTree, CachingDependencyResolveContext, DependencyResolveContext};

/// Print the dependencies and constraints reachable from a configuration
#[derive(Args, Debug)]
pub struct Closure {
    /// Project path, e.g. `:app`
    pub project: String,

    /// Configuration whose declared dependencies seed the walk
    pub configuration: String,

    /// Do not follow the dependencies of project dependencies
    #[arg(long)]
    pub intransitive: bool,
}

impl Closure {
    pub fn run(&self, tree: &BuildTree) -> Result<()> {
        let (project, configuration) = super::select(tree, &self.project, &self.configuration)?;

        let mut context = CachingDependencyResolveContext::new(!self.intransitive);
        for dependency in project.configurations().all_dependencies(&configuration)? {
            context.add_dependency(dependency);
        }
        let closure = context.resolve()?;

        println!("{}", "Dependencies".bold());
        for dependency in &closure.dependencies {
            println!("  {dependency}");
        }
        if !closure.constraints.is_empty() {
            println!("{}", "Constraints".bold());
            for constraint in &closure.constraints {
                match &constraint.reason {
                    Some(reason) => println!("  {constraint} ({reason})"),
                    None => println!("  {constraint}"),
                }
            }
        }
        Ok(())
    }
}
