// projdep/src/cli/files.rs
use clap::Args;
use projdep_common::error::Result;
use projdep_core::BuildTree;

/// Resolve the files of each project dependency directly (legacy behaviour)
#[derive(Args, Debug)]
pub struct Files {
    /// Project path, e.g. `:app`
    pub project: String,

    pub configuration: String,

    /// Only the files of the targeted configurations themselves
    #[arg(long)]
    pub intransitive: bool,
}

impl Files {
    #[allow(deprecated)]
    pub fn run(&self, tree: &BuildTree) -> Result<()> {
        let (project, configuration) = super::select(tree, &self.project, &self.configuration)?;

        for dependency in project.configurations().all_dependencies(&configuration)? {
            let Some(edge) = dependency.as_project() else {
                continue;
            };
            for file in edge.resolve_files(!self.intransitive)? {
                println!("{}", file.display());
            }
        }
        Ok(())
    }
}
