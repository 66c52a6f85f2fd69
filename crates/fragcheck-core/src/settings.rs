//! Settings domain types and validation.
//!
//! Thresholds and locations used by the checks. These are pure domain types;
//! the CLI fills them from flags and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Time per event (seconds) above which a request is flagged.
pub const DEFAULT_MAX_TIME_PER_EVENT: f64 = 150.0;

/// Total number of events at or above which a request is flagged.
pub const DEFAULT_MAX_TOTAL_EVENTS: u64 = 100_000_000;

/// `bwcutoff` values above this are known to cause trouble in production.
pub const DEFAULT_MAX_BWCUTOFF: f64 = 15.0;

/// Prefix of gridpacks published on cvmfs.
pub const DEFAULT_CVMFS_PREFIX: &str = "/cvmfs/cms.cern.ch/phys_generator";

/// Prefix of the EOS area that backs the cvmfs gridpack repository.
pub const DEFAULT_EOS_PREFIX: &str = "/eos/cms/store/group/phys_generator/cvmfs";

/// Script that rewrites MG5_aMC LO gridpacks with the many-threads fix.
pub const DEFAULT_PATCH_SCRIPT: &str = "../../Utilities/scripts/update_gridpacks_mg242_thread.py";

/// Settings for a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory gridpacks are unpacked into. `None` uses the per-user temp area.
    pub work_dir: Option<PathBuf>,

    pub max_time_per_event: f64,

    pub max_total_events: u64,

    pub max_bwcutoff: f64,

    pub cvmfs_prefix: String,

    pub eos_prefix: String,

    /// Skip requests that are not in the `defined` state.
    pub require_defined_status: bool,

    /// Run the many-threads patch script on gridpacks missing the fix.
    pub apply_many_threads_patch: bool,

    /// Keep unpacked gridpacks after checking (debugging aid).
    pub keep_workspace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: None,
            max_time_per_event: DEFAULT_MAX_TIME_PER_EVENT,
            max_total_events: DEFAULT_MAX_TOTAL_EVENTS,
            max_bwcutoff: DEFAULT_MAX_BWCUTOFF,
            cvmfs_prefix: DEFAULT_CVMFS_PREFIX.to_string(),
            eos_prefix: DEFAULT_EOS_PREFIX.to_string(),
            require_defined_status: true,
            apply_many_threads_patch: false,
            keep_workspace: false,
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Time per event threshold must be positive, got {0}")]
    InvalidTimePerEvent(f64),

    #[error("Total events threshold must be positive")]
    InvalidTotalEvents,

    #[error("bwcutoff threshold must be positive, got {0}")]
    InvalidBwCutoff(f64),

    #[error("{0} prefix cannot be empty")]
    EmptyPrefix(&'static str),

    #[error("Work directory cannot be empty")]
    EmptyWorkDir,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.max_time_per_event.is_nan() || settings.max_time_per_event <= 0.0 {
        return Err(SettingsError::InvalidTimePerEvent(settings.max_time_per_event));
    }

    if settings.max_total_events == 0 {
        return Err(SettingsError::InvalidTotalEvents);
    }

    if settings.max_bwcutoff.is_nan() || settings.max_bwcutoff <= 0.0 {
        return Err(SettingsError::InvalidBwCutoff(settings.max_bwcutoff));
    }

    if settings.cvmfs_prefix.trim().is_empty() {
        return Err(SettingsError::EmptyPrefix("cvmfs"));
    }

    if settings.eos_prefix.trim().is_empty() {
        return Err(SettingsError::EmptyPrefix("EOS"));
    }

    if settings
        .work_dir
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(SettingsError::EmptyWorkDir);
    }

    Ok(())
}
