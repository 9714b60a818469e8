// projdep-common/src/error.rs
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ProjdepError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration with name '{name}' not found in {project}.")]
    NoSuchConfiguration { project: String, name: String },

    /// The selected configuration exists but was never meant to be a dependency target.
    #[error("Selected configuration '{configuration}' on '{project}' but it can't be used as a project dependency because it isn't intended for consumption by other components.")]
    ConfigurationNotConsumable {
        project: String,
        configuration: String,
    },

    #[error("Configuration '{name}' already exists in {project}.")]
    DuplicateConfiguration { project: String, name: String },

    #[error("Configuration hierarchy of '{name}' in {project} contains a cycle.")]
    ConfigurationCycle { project: String, name: String },

    #[error("Project with path '{0}' could not be found.")]
    UnknownProject(String),

    #[error("Invalid path '{0}'")]
    InvalidPath(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Build File Error: {0}")]
    BuildFile(String),

    #[error("Deprecated features were used in this build ({0} deprecation(s)), failing due to warning mode 'fail'.")]
    DeprecationsFailed(usize),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for ProjdepError {
    fn from(err: std::io::Error) -> Self {
        ProjdepError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for ProjdepError {
    fn from(err: serde_json::Error) -> Self {
        ProjdepError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ProjdepError>;
