// projdep-common/src/config.rs
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProjdepError, Result};

/// Configuration selected when a project dependency does not name one.
pub const DEFAULT_CONFIGURATION: &str = "default";

const DEFAULT_BUILD_FILE: &str = "build.json";
const WARNING_MODE_VAR: &str = "PROJDEP_WARNING_MODE";
const BUILD_FILE_VAR: &str = "PROJDEP_BUILD_FILE";

/// How deprecation notices are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningMode {
    /// Log every notice as it happens.
    All,
    /// Record notices, log a single summary line when the build finishes.
    #[default]
    Summary,
    /// Record notices silently.
    None,
    /// Like `All`, but finishing the build fails if anything was recorded.
    Fail,
}

impl FromStr for WarningMode {
    type Err = ProjdepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "summary" => Ok(Self::Summary),
            "none" => Ok(Self::None),
            "fail" => Ok(Self::Fail),
            other => Err(ProjdepError::Config(format!(
                "Unknown warning mode '{other}', expected one of all, summary, none, fail"
            ))),
        }
    }
}

impl fmt::Display for WarningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Summary => "summary",
            Self::None => "none",
            Self::Fail => "fail",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub warning_mode: WarningMode,
    pub build_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warning_mode: WarningMode::default(),
            build_file: PathBuf::from(DEFAULT_BUILD_FILE),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading projdep configuration");
        Self::load_from(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let warning_mode = match lookup(WARNING_MODE_VAR).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => {
                debug!(
                    "{} not set, falling back to default: {}",
                    WARNING_MODE_VAR,
                    WarningMode::default()
                );
                WarningMode::default()
            }
        };

        let build_file = lookup(BUILD_FILE_VAR)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_FILE));
        debug!("Effective build file set to: {}", build_file.display());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            warning_mode,
            build_file,
        })
    }

    pub fn build_file(&self) -> &Path {
        &self.build_file
    }
}
