// projdep-common/src/model/path.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProjdepError, Result};

const SEPARATOR: char = ':';

/// Absolute, `:`-separated path of a project within the build tree. `:` is the root project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectPath {
    segments: Vec<String>,
}

impl ProjectPath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw
            .strip_prefix(SEPARATOR)
            .ok_or_else(|| ProjdepError::InvalidPath(format!("{raw} (must start with ':')")))?;
        if rest.is_empty() {
            return Ok(Self::root());
        }
        let segments = rest
            .split(SEPARATOR)
            .map(|segment| {
                if segment.is_empty() || segment.chars().any(char::is_whitespace) {
                    Err(ProjdepError::InvalidPath(raw.to_string()))
                } else {
                    Ok(segment.to_string())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn child(&self, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(SEPARATOR) {
            return Err(ProjdepError::InvalidPath(format!("{self} + '{name}'")));
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(":");
        }
        for segment in &self.segments {
            write!(f, ":{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ProjectPath {
    type Err = ProjdepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectPath {
    type Error = ProjdepError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ProjectPath> for String {
    fn from(path: ProjectPath) -> Self {
        path.to_string()
    }
}

/// A task addressed by its owning project and name, e.g. `:lib:jar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskPath {
    pub project: ProjectPath,
    pub name: String,
}

impl TaskPath {
    pub fn new(project: ProjectPath, name: impl Into<String>) -> Self {
        Self {
            project,
            name: name.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let (project, name) = raw
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| ProjdepError::InvalidPath(format!("{raw} (not a task path)")))?;
        if name.is_empty() {
            return Err(ProjdepError::InvalidPath(format!("{raw} (missing task name)")));
        }
        let project = if project.is_empty() {
            ProjectPath::root()
        } else {
            ProjectPath::parse(project)?
        };
        Ok(Self::new(project, name))
    }
}

impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.project.is_root() {
            write!(f, ":{}", self.name)
        } else {
            write!(f, "{}:{}", self.project, self.name)
        }
    }
}

impl TryFrom<String> for TaskPath {
    type Error = ProjdepError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TaskPath> for String {
    fn from(path: TaskPath) -> Self {
        path.to_string()
    }
}
