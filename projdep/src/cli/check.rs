// projdep/src/cli/check.rs
use clap::Args;
use colored::Colorize;
use projdep_common::error::{ProjdepError, Result};
use projdep_core::BuildTree;
use tracing::debug;

/// Resolve the target configuration of every project dependency in the build
#[derive(Args, Debug)]
pub struct Check;

impl Check {
    pub fn run(&self, tree: &BuildTree) -> Result<()> {
        let mut checked = 0usize;
        let mut failed = 0usize;
        for project in tree.projects() {
            for name in project.configurations().names() {
                let Some(configuration) = project.configurations().find_by_name(&name) else {
                    continue;
                };
                for dependency in configuration.dependencies() {
                    let Some(edge) = dependency.as_project() else {
                        continue;
                    };
                    checked += 1;
                    let origin = format!("{} ({})", project.display_name(), name);
                    match edge.find_project_configuration() {
                        Ok(target) => println!(
                            "{} {} -> {} [{}]",
                            "✓".green(),
                            origin,
                            edge,
                            target.name()
                        ),
                        Err(e) => {
                            failed += 1;
                            println!("{} {} -> {}: {}", "✗".red(), origin, edge, e);
                        }
                    }
                }
            }
        }
        debug!("Checked {} project dependencies, {} failed", checked, failed);

        if failed > 0 {
            return Err(ProjdepError::Generic(format!(
                "{failed} of {checked} project dependencies could not be resolved"
            )));
        }
        println!("{}", format!("{checked} project dependencies OK").bold());
        Ok(())
    }
}
