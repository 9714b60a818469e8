// projdep/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use projdep_common::config::WarningMode;
use projdep_common::error::{ProjdepError, Result};
use projdep_common::model::ProjectPath;
use projdep_core::{BuildTree, Configuration, Project};

pub mod check;
pub mod closure;
pub mod files;
pub mod tasks;

use crate::cli::check::Check;
use crate::cli::closure::Closure;
use crate::cli::files::Files;
use crate::cli::tasks::Tasks;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "projdep", bin_name = "projdep")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Build description to load (overrides PROJDEP_BUILD_FILE)
    #[arg(short, long, global = true)]
    pub build: Option<PathBuf>,

    /// How deprecations are reported (overrides PROJDEP_WARNING_MODE)
    #[arg(long, global = true, value_parser = parse_warning_mode)]
    pub warning_mode: Option<WarningMode>,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_warning_mode(raw: &str) -> std::result::Result<WarningMode, String> {
    raw.parse().map_err(|e: ProjdepError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Check(Check),
    Closure(Closure),
    Tasks(Tasks),
    Files(Files),
}

impl Command {
    pub fn run(&self, tree: &BuildTree) -> Result<()> {
        match self {
            Self::Check(command) => command.run(tree),
            Self::Closure(command) => command.run(tree),
            Self::Tasks(command) => command.run(tree),
            Self::Files(command) => command.run(tree),
        }
    }
}

/// Looks up `<project> <configuration>` as given on the command line.
pub(crate) fn select(
    tree: &BuildTree,
    project: &str,
    configuration: &str,
) -> Result<(Arc<Project>, Arc<Configuration>)> {
    let project = tree.project(&ProjectPath::parse(project)?)?;
    let configuration = project.configurations().get_by_name(configuration)?;
    Ok((project, configuration))
}
