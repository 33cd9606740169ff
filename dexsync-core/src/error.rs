//! Error types for dexsync-core.

use thiserror::Error;

/// Errors raised while assembling [`crate::Settings`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or blank.
    #[error("missing required environment variable(s): {}", names.join(", "))]
    Missing { names: Vec<&'static str> },
}
