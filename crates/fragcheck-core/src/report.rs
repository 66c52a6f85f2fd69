//! Findings and per-request reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest value a process exit code can carry.
pub const MAX_EXIT_CODE: usize = 255;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A check passed.
    Ok,
    /// Needs a human look; does not block validation.
    Warning,
    /// Blocks the request from moving to validation.
    Error,
    /// Context printed alongside the checks.
    Info,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    /// Continuation lines (hints, offending values).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Append a continuation line.
    pub fn detail(&mut self, line: impl Into<String>) -> &mut Self {
        self.details.push(line.into());
        self
    }
}

/// Ordered collection of findings for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Findings(Vec<Finding>);

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> &mut Finding {
        self.0.push(Finding::new(severity, message));
        let last = self.0.len() - 1;
        &mut self.0[last]
    }

    pub fn ok(&mut self, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Ok, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Info, message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.0.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.0.iter().filter(|f| f.severity == severity).count()
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Why a request was not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The request is past the `defined` state.
    NotDefined { status: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDefined { status } => {
                write!(f, "request is in '{status}' state, not defined")
            }
        }
    }
}

/// What happened to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Checked { findings: Findings },
    Skipped { skip: SkipReason },
}

/// Result of checking one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReport {
    pub prepid: String,
    pub dataset_name: String,
    pub status: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl RequestReport {
    pub fn checked(
        prepid: impl Into<String>,
        dataset_name: impl Into<String>,
        status: impl Into<String>,
        findings: Findings,
    ) -> Self {
        Self {
            prepid: prepid.into(),
            dataset_name: dataset_name.into(),
            status: status.into(),
            outcome: Outcome::Checked { findings },
        }
    }

    pub fn skipped(
        prepid: impl Into<String>,
        dataset_name: impl Into<String>,
        status: impl Into<String>,
        skip: SkipReason,
    ) -> Self {
        Self {
            prepid: prepid.into(),
            dataset_name: dataset_name.into(),
            status: status.into(),
            outcome: Outcome::Skipped { skip },
        }
    }

    pub const fn findings(&self) -> Option<&Findings> {
        match &self.outcome {
            Outcome::Checked { findings } => Some(findings),
            Outcome::Skipped { .. } => None,
        }
    }

    pub fn warnings(&self) -> usize {
        self.findings().map_or(0, Findings::warnings)
    }

    pub fn errors(&self) -> usize {
        self.findings().map_or(0, Findings::errors)
    }

    /// Process exit code for this request: the error count, clamped to 255.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.errors().min(MAX_EXIT_CODE)).unwrap_or(u8::MAX)
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped { .. })
    }
}
