// projdep/src/cli/tasks.rs
use std::collections::BTreeSet;

use clap::Args;
use colored::Colorize;
use projdep_common::error::Result;
use projdep_core::BuildTree;

/// Print the tasks the project dependencies of a configuration require
#[derive(Args, Debug)]
pub struct Tasks {
    /// Project path, e.g. `:app`
    pub project: String,

    pub configuration: String,
}

impl Tasks {
    pub fn run(&self, tree: &BuildTree) -> Result<()> {
        let (project, configuration) = super::select(tree, &self.project, &self.configuration)?;

        let mut all = BTreeSet::new();
        for dependency in project.configurations().all_dependencies(&configuration)? {
            let Some(edge) = dependency.as_project() else {
                continue;
            };
            let tasks = edge.task_dependencies().get_dependencies()?;
            println!("{}", edge.to_string().bold());
            if tasks.is_empty() {
                println!("  {}", "(no tasks)".dimmed());
            }
            for task in &tasks {
                println!("  {task}");
            }
            all.extend(tasks);
        }

        println!(
            "{} {}",
            "==>".bold().blue(),
            format!("{} task(s) must run first", all.len()).bold()
        );
        Ok(())
    }
}
