//! Many-threads patch runner port.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// What the patch script should rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchTarget {
    /// The gridpack referenced by a request.
    Prepid(String),
    /// One gridpack of a parameter scan.
    Gridpack(PathBuf),
}

impl fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepid(prepid) => write!(f, "request {prepid}"),
            Self::Gridpack(path) => write!(f, "gridpack {}", path.display()),
        }
    }
}

/// Errors from running the patch script.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Failed to launch patch script: {0}")]
    Spawn(String),

    #[error("Patch script exited with status {code:?} for {target}")]
    Failed { target: String, code: Option<i32> },
}

/// Port trait for the MG5_aMC LO many-threads patch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatchRunnerPort: Send + Sync {
    async fn apply(&self, target: &PatchTarget) -> Result<(), PatchError>;
}
