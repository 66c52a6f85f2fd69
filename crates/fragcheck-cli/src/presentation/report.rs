//! Report rendering in the classic `* [OK]` / `* [WARNING]` / `* [ERROR]` layout.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use fragcheck_core::{Finding, RequestReport};
use serde::Serialize;

const RULE: &str =
    "***********************************************************************************";
const TICKET_RULE: &str = "------------------------------------";
const DETAIL_INDENT: &str = "*           ";

/// What is being checked, printed before the first request.
pub fn render_header(
    explicit: &[String],
    ticket: Option<&str>,
    selected: &[String],
    now: DateTime<Local>,
    dev: bool,
) -> String {
    let mut out = String::new();
    if !explicit.is_empty() {
        let _ = writeln!(out, "---> {} requests will be checked:", explicit.len());
    }
    out.push_str(" \n");
    if dev {
        out.push_str("Running on McM DEV!\n\n");
    }
    if let Some(ticket) = ticket {
        let _ = writeln!(out, "{TICKET_RULE}\n--> Ticket = {ticket}\n{TICKET_RULE}");
    }
    let _ = writeln!(
        out,
        "Current date and time: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    );
    for prepid in selected {
        let _ = writeln!(out, "{prepid}");
    }
    out
}

fn render_finding(out: &mut String, finding: &Finding) {
    let _ = writeln!(out, "* [{}] {}", finding.severity, finding.message);
    for line in &finding.details {
        let _ = writeln!(out, "{DETAIL_INDENT}{line}");
    }
}

/// Request banner plus the skip notice.
pub fn render_skip(report: &RequestReport) -> String {
    let mut out = banner(report);
    out.push_str("--> Skipping since the request is not in defined state\n");
    out.push_str("--> Use --bypass-status option to look at all requests irrespective of state\n");
    out
}

fn banner(report: &RequestReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "{}    Status= {}", report.prepid, report.status);
    if !report.dataset_name.is_empty() {
        let _ = writeln!(out, "{}", report.dataset_name);
    }
    out
}

/// Full text report of one request.
pub fn render_report(report: &RequestReport) -> String {
    let Some(findings) = report.findings() else {
        return render_skip(report);
    };

    let mut out = banner(report);
    for finding in findings {
        render_finding(&mut out, finding);
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Number of warnings = {}", report.warnings());
    let _ = writeln!(out, "Number of errors = {}", report.errors());
    if report.errors() > 0 {
        out.push_str("There is at least 1 error. Request won't proceed to VALIDATION\n");
    }
    out
}

/// JSON document for `--format json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub checked_at: DateTime<Local>,
    pub dev: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    pub prepids: Vec<String>,
    pub reports: Vec<RequestReport>,
    pub exit_code: u8,
}
