// projdep-common/src/deprecation.rs
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::config::WarningMode;
use super::error::{ProjdepError, Result};

const UPGRADE_GUIDE_MAJOR_VERSION: u32 = 8;
const UPGRADE_GUIDE_SECTION: &str = "deprecate_self_resolving_dependency";

/// A single advisory signal. Never aborts the operation that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub summary: String,
    pub advice: Option<String>,
    pub upgrade_guide: Option<String>,
}

impl DeprecationNotice {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            advice: None,
            upgrade_guide: None,
        }
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    pub fn with_upgrade_guide_section(mut self, major: u32, section: &str) -> Self {
        self.upgrade_guide = Some(format!("upgrading_version_{major}#{section}"));
        self
    }

    pub fn direct_project_dependency_resolution() -> Self {
        Self::new("Directly resolving a project dependency's files")
            .with_advice(
                "Add the dependency to a resolvable configuration and resolve the configuration.",
            )
            .with_upgrade_guide_section(UPGRADE_GUIDE_MAJOR_VERSION, UPGRADE_GUIDE_SECTION)
    }

    pub fn project_dependency_build_dependencies() -> Self {
        Self::new("Accessing the build dependencies of a project dependency")
            .with_advice("Add the dependency to a resolvable configuration and use the configuration to track task dependencies.")
            .with_upgrade_guide_section(UPGRADE_GUIDE_MAJOR_VERSION, UPGRADE_GUIDE_SECTION)
    }

    pub fn configuration_consumption(configuration: &str, replacements: &[String]) -> Self {
        let notice = Self::new(format!(
            "The {configuration} configuration has been deprecated for consumption"
        ));
        match replacements {
            [] => notice,
            [only] => notice.with_advice(format!("Please use the {only} configuration instead.")),
            many => notice.with_advice(format!(
                "Please use one of the {} configurations instead.",
                many.join(", ")
            )),
        }
    }
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. This behavior is deprecated and will become an error in the next major version.",
            self.summary
        )?;
        if let Some(advice) = &self.advice {
            write!(f, " {advice}")?;
        }
        if let Some(guide) = &self.upgrade_guide {
            write!(f, " See {guide} for more details.")?;
        }
        Ok(())
    }
}

/// Build-wide sink for deprecation notices.
#[derive(Debug, Default)]
pub struct DeprecationReporter {
    mode: WarningMode,
    notices: Mutex<Vec<DeprecationNotice>>,
}

impl DeprecationReporter {
    pub fn new(mode: WarningMode) -> Self {
        Self {
            mode,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Records the notice. Repeated reports are kept; deduplication is not this sink's job.
    pub fn report(&self, notice: DeprecationNotice) {
        match self.mode {
            WarningMode::All | WarningMode::Fail => warn!("{}", notice),
            WarningMode::Summary | WarningMode::None => debug!("Deprecation recorded: {}", notice.summary),
        }
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }

    pub fn notices(&self) -> Vec<DeprecationNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Applies the warning mode once the build is done and returns the number of notices.
    pub fn finish(&self) -> Result<usize> {
        let count = self.count();
        match self.mode {
            WarningMode::Summary if count > 0 => {
                warn!("Deprecated features were used in this build ({count} deprecation(s)). Use warning mode 'all' to show the individual deprecation warnings.");
            }
            WarningMode::Fail if count > 0 => return Err(ProjdepError::DeprecationsFailed(count)),
            _ => {}
        }
        Ok(count)
    }
}
