//! Error types for planning and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pulse calculation and plan generation.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised by the rate calculators and the plan generator.
///
/// Both variants are terminal: every planning operation is pure, so the
/// same input always reproduces the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A divisor or step that must be positive was not.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller's constraints cannot be satisfied.
    #[error("{0}")]
    ConstraintViolation(String),
}

impl PlanError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PlanError::InvalidArgument(msg.into())
    }
}

/// Errors raised while loading config or list files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid duration {input:?}: {reason}")]
    Duration { input: String, reason: String },

    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}
