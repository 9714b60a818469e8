// projdep/src/main.rs
use std::process;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use projdep_common::config::Config;
use projdep_common::deprecation::DeprecationReporter;
use projdep_common::error::{ProjdepError, Result};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod build_file;
mod cli;

use build_file::BuildFile;
use cli::CliArgs;

fn main() {
    let cli_args = CliArgs::parse();

    let level_filter = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("PROJDEP_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();

    if let Err(e) = run(&cli_args) {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
    debug!("Command completed successfully.");
}

fn run(cli_args: &CliArgs) -> Result<()> {
    let mut config = Config::load()
        .map_err(|e| ProjdepError::Config(format!("Could not load config: {e}")))?;
    if let Some(build) = &cli_args.build {
        config.build_file = build.clone();
    }
    if let Some(mode) = cli_args.warning_mode {
        config.warning_mode = mode;
    }
    debug!(
        "Using build file {} with warning mode {}",
        config.build_file().display(),
        config.warning_mode
    );

    let deprecations = Arc::new(DeprecationReporter::new(config.warning_mode));
    let tree = BuildFile::read(config.build_file())?.into_tree(Arc::clone(&deprecations))?;

    let outcome = cli_args.command.run(&tree);
    // deprecations are settled even when the command failed
    let finished = deprecations.finish();
    outcome?;
    finished.map(|_| ())
}
