//! Gridpack storage port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::GridpackWorkspace;

/// Errors from gridpack storage operations.
#[derive(Debug, Error)]
pub enum GridpackError {
    /// The archive (or scan directory) does not exist.
    #[error("Gridpack not found: {0}")]
    NotFound(PathBuf),

    /// The archive could not be unpacked.
    #[error("Failed to extract {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    /// A wildcard pattern was malformed.
    #[error("Invalid gridpack pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Filesystem error on the work directory.
    #[error("Work directory error at {path}: {reason}")]
    Workspace { path: PathBuf, reason: String },
}

/// Port trait for locating and unpacking gridpacks.
///
/// The implementation lives in `fragcheck-gridpack`.
#[async_trait]
pub trait GridpackPort: Send + Sync {
    /// Create (or reset) the extraction directories for a request.
    async fn prepare_workspace(&self, prepid: &str) -> Result<GridpackWorkspace, GridpackError>;

    /// First path matching a wildcard pattern, in sorted order.
    async fn resolve_first(&self, pattern: &str) -> Result<Option<PathBuf>, GridpackError>;

    /// Entries of a directory, sorted by name.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, GridpackError>;

    /// Unpack an archive into `dest`.
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), GridpackError>;

    /// Remove the extraction directories of a request.
    async fn cleanup(&self, workspace: &GridpackWorkspace) -> Result<(), GridpackError>;
}
