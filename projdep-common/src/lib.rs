// projdep-common/src/lib.rs
pub mod config;
pub mod deprecation;
pub mod error;
pub mod model;

// Re-export key types
pub use config::{Config, WarningMode, DEFAULT_CONFIGURATION};
pub use deprecation::{DeprecationNotice, DeprecationReporter};
pub use error::{ProjdepError, Result};
