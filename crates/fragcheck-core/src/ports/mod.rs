//! Port definitions (traits) implemented by the adapter crates.
//!
//! The core never talks HTTP or touches archives directly; it goes through
//! these traits so the checks can be exercised with in-memory fakes.

mod gridpack;
mod mcm;
mod patch;

use thiserror::Error;

pub use gridpack::{GridpackError, GridpackPort};
pub use mcm::{McmClientPort, McmPortError, McmPortResult};
pub use patch::{PatchError, PatchRunnerPort, PatchTarget};

#[cfg(test)]
pub use mcm::MockMcmClientPort;
#[cfg(test)]
pub use patch::MockPatchRunnerPort;

/// Top-level error for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request-tracking service failure.
    #[error(transparent)]
    Mcm(#[from] McmPortError),

    /// Gridpack storage failure outside of a single check.
    #[error(transparent)]
    Gridpack(#[from] GridpackError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
