//! CMSSW release names.

use std::fmt;

/// Release series that ship the GEN fixes the checks rely on.
const STANDARD_SERIES: &[(u32, u32)] = &[(10, 2), (9, 3), (7, 1)];

/// A parsed `CMSSW_<major>_<minor>_<patch>[_<suffix>]` release name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsswRelease {
    raw: String,
    version: Option<(u32, u32, u32)>,
    suffix: Option<String>,
}

impl CmsswRelease {
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.trim().split('_').collect();
        let number = |i: usize| parts.get(i).and_then(|p| p.parse::<u32>().ok());

        let version = match (number(1), number(2), number(3)) {
            (Some(major), Some(minor), Some(patch)) => Some((major, minor, patch)),
            _ => None,
        };
        let suffix = if parts.len() > 4 {
            Some(parts[4..].join("_"))
        } else {
            None
        };

        Self {
            raw: raw.trim().to_string(),
            version,
            suffix,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `(major, minor, patch)` when the name is well formed.
    pub const fn version(&self) -> Option<(u32, u32, u32)> {
        self.version
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    fn series(&self) -> Option<(u32, u32)> {
        self.version.map(|(major, minor, _)| (major, minor))
    }

    fn in_series(&self, major: u32, minor: u32) -> bool {
        self.series() == Some((major, minor))
    }

    /// Whether this release belongs to one of the supported GEN series.
    pub fn is_standard(&self) -> bool {
        match self.series() {
            Some(series) => STANDARD_SERIES.contains(&series),
            None => ["10_2", "9_3", "7_1"].iter().any(|s| self.raw.contains(s)),
        }
    }

    /// Whether the release is strictly older than `major_minor_patch`.
    pub fn is_older_than(&self, major: u32, minor: u32, patch: u32) -> bool {
        self.version.is_some_and(|v| v < (major, minor, patch))
    }

    fn has_patch1(&self) -> bool {
        self.raw.contains("patch1")
    }

    /// Whether the release lacks the MG5_aMC tmpdir fix.
    ///
    /// Returns the minimum release to recommend when it does.
    pub fn tmpdir_fix_missing(&self) -> Option<&'static str> {
        let Some((_, _, patch)) = self.version else {
            return Some(TMPDIR_FIX_ANY);
        };
        let suffixed = self.suffix.is_some();

        if !self.is_standard() {
            Some(TMPDIR_FIX_ANY)
        } else if self.in_series(7, 1) {
            let old = if suffixed {
                patch < 32 || (patch == 32 && !self.has_patch1())
            } else {
                patch < 33
            };
            old.then_some("CMSSW_7_1_32_patch1")
        } else if self.in_series(9, 3) {
            let old = if suffixed {
                patch < 9 || (patch == 9 && !self.has_patch1())
            } else {
                patch < 10
            };
            old.then_some("CMSSW_9_3_9_patch1")
        } else {
            (!suffixed && patch < 1).then_some("CMSSW_10_2_0_pre2")
        }
    }
}

/// Recommendation for releases outside the supported series.
pub const TMPDIR_FIX_ANY: &str = ">= 7_1_32_patch1 or CMSSW_9_3_9_patch1 or 10_2_0_pre2";

impl fmt::Display for CmsswRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
