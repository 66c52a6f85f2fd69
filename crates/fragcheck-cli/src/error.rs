//! CLI error type and exit codes.

use fragcheck_core::{CoreError, McmPortError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// McM could not be reached or answered garbage.
    #[error("McM error: {0}")]
    Service(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to an exit code (see sysexits.h).
    ///
    /// Check runs exit with their error count instead; these codes only apply
    /// when the run could not start.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 64, // EX_USAGE
            Self::Service(_) => 69,   // EX_UNAVAILABLE
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Mcm(McmPortError::Configuration { message }) => Self::Config(message),
            CoreError::Mcm(e) => Self::Service(e.to_string()),
            CoreError::Gridpack(e) => Self::Io(e.to_string()),
            CoreError::Settings(e) => Self::Config(e.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Core(format!("Failed to serialize report: {err}"))
    }
}
