//! Gridpack store on the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fragcheck_core::GridpackWorkspace;
use fragcheck_core::ports::{GridpackError, GridpackPort};

use crate::archive;

/// Unpacks gridpacks under a per-user work root.
///
/// Each request gets `<root>/<prepid>` for the cvmfs gridpack and
/// `<root>/eos/<prepid>` for its EOS source.
#[derive(Debug, Clone)]
pub struct LocalGridpackStore {
    root: PathBuf,
}

impl LocalGridpackStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn workspace_for(&self, prepid: &str) -> GridpackWorkspace {
        GridpackWorkspace {
            cvmfs_dir: self.root.join(prepid),
            eos_dir: self.root.join("eos").join(prepid),
        }
    }
}

fn workspace_error(path: &Path, e: &io::Error) -> GridpackError {
    GridpackError::Workspace {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

async fn reset_dir(dir: &Path) -> Result<(), GridpackError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(workspace_error(dir, &e)),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| workspace_error(dir, &e))
}

async fn remove_dir(dir: &Path) -> Result<(), GridpackError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(workspace_error(dir, &e)),
    }
}

/// All paths matching `pattern`, sorted.
fn glob_sorted(pattern: &str) -> Result<Vec<PathBuf>, GridpackError> {
    let paths = glob::glob(pattern).map_err(|e| GridpackError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    // Unreadable entries are skipped, same as a shell wildcard
    let mut matches: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
    matches.sort();
    Ok(matches)
}

#[async_trait]
impl GridpackPort for LocalGridpackStore {
    async fn prepare_workspace(&self, prepid: &str) -> Result<GridpackWorkspace, GridpackError> {
        let workspace = self.workspace_for(prepid);
        reset_dir(&workspace.cvmfs_dir).await?;
        reset_dir(&workspace.eos_dir).await?;
        tracing::debug!(
            cvmfs = %workspace.cvmfs_dir.display(),
            eos = %workspace.eos_dir.display(),
            "Prepared gridpack workspace"
        );
        Ok(workspace)
    }

    async fn resolve_first(&self, pattern: &str) -> Result<Option<PathBuf>, GridpackError> {
        let owned = pattern.to_string();
        let matches = tokio::task::spawn_blocking(move || glob_sorted(&owned))
            .await
            .map_err(|e| GridpackError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("join error: {e}"),
            })??;
        Ok(matches.into_iter().next())
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, GridpackError> {
        let mut reader = match tokio::fs::read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GridpackError::NotFound(dir.to_path_buf()));
            }
            Err(e) => return Err(workspace_error(dir, &e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| workspace_error(dir, &e))?
        {
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), GridpackError> {
        if !tokio::fs::try_exists(archive).await.unwrap_or(false) {
            return Err(GridpackError::NotFound(archive.to_path_buf()));
        }

        let archive_owned = archive.to_path_buf();
        let dest_owned = dest.to_path_buf();
        let format = tokio::task::spawn_blocking(move || archive::unpack(&archive_owned, &dest_owned))
            .await
            .map_err(|e| GridpackError::Extraction {
                path: archive.to_path_buf(),
                reason: format!("join error: {e}"),
            })?
            .map_err(|e| GridpackError::Extraction {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            archive = %archive.display(),
            dest = %dest.display(),
            ?format,
            "Gridpack extracted"
        );
        Ok(())
    }

    async fn cleanup(&self, workspace: &GridpackWorkspace) -> Result<(), GridpackError> {
        remove_dir(&workspace.cvmfs_dir).await?;
        remove_dir(&workspace.eos_dir).await
    }
}
