//! Gridpack locations and extracted gridpack contents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::fragment::Fragment;

/// Directories a single request is unpacked into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridpackWorkspace {
    /// Extraction target for the gridpack referenced by the fragment (cvmfs).
    pub cvmfs_dir: PathBuf,
    /// Extraction target for the EOS mirror of the gridpack.
    pub eos_dir: PathBuf,
}

/// Where the gridpack of a request lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridpackLocation {
    /// Path as written in the fragment. Scan placeholders are replaced by `*`.
    pub cvmfs_path: String,
    /// Same gridpack on the EOS area backing cvmfs.
    pub eos_path: String,
    /// Parameter scan: the fragment selects one of many gridpacks at runtime.
    pub scan: bool,
}

impl GridpackLocation {
    /// Derive the location from a fragment, mapping `cvmfs_prefix` onto `eos_prefix`.
    pub fn from_fragment(fragment: &Fragment, cvmfs_prefix: &str, eos_prefix: &str) -> Option<Self> {
        let path = fragment.gridpack_path()?;
        let eos_path = path.replace(cvmfs_prefix, eos_prefix);
        let scan = fragment.is_parameter_scan();
        let cvmfs_path = if scan {
            path.replace("%i", "*").replace("%s", "*")
        } else {
            path
        };

        Some(Self {
            cvmfs_path,
            eos_path,
            scan,
        })
    }

    /// Directory on EOS holding every gridpack of a scan.
    pub fn eos_scan_dir(&self) -> PathBuf {
        Path::new(&self.eos_path)
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf)
    }
}

/// Read-only view of an unpacked gridpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridpackContents {
    root: PathBuf,
}

impl GridpackContents {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).is_file()
    }

    /// Text of a file inside the gridpack; `None` when missing or unreadable.
    pub fn read(&self, relative: &str) -> Option<String> {
        fs::read(self.path(relative))
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Number of lines of `relative` containing `needle` (0 for a missing file).
    pub fn count_lines(&self, relative: &str, needle: &str) -> usize {
        self.read(relative)
            .map_or(0, |text| text.lines().filter(|l| l.contains(needle)).count())
    }
}
