//! Work directory resolution.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the work directory.
pub const WORK_DIR_ENV: &str = "FRAGCHECK_WORK_DIR";

/// Resolve the root directory gridpacks are unpacked into.
///
/// Resolution order:
/// 1. Explicit override (flag or settings)
/// 2. `FRAGCHECK_WORK_DIR` environment variable
/// 3. `<tmp>/<user>/gridpacks`
pub fn resolve_work_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var(WORK_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    default_work_dir()
}

/// `<tmp>/<user>/gridpacks`, so concurrent users on a shared node do not collide.
pub fn default_work_dir() -> PathBuf {
    let user = env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "fragcheck".to_string());
    env::temp_dir().join(user).join("gridpacks")
}
