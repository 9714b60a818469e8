// projdep-common/src/model/artifact.rs
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::path::TaskPath;

/// A file a configuration publishes, together with the tasks that produce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishArtifact {
    pub name: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub built_by: Vec<TaskPath>,
}

fn default_extension() -> String {
    "jar".to_string()
}

impl PublishArtifact {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            extension: default_extension(),
            classifier: None,
            file: file.into(),
            built_by: Vec::new(),
        }
    }

    pub fn built_by(mut self, task: TaskPath) -> Self {
        self.built_by.push(task);
        self
    }
}

impl fmt::Display for PublishArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(f, "{}-{}.{}", self.name, c, self.extension),
            None => write!(f, "{}.{}", self.name, self.extension),
        }
    }
}
