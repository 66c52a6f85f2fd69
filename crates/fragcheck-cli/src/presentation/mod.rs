//! Terminal and JSON rendering of check runs.
//!
//! Format-only: counts and verdicts come from the core report types.

pub mod report;

pub use report::{RunSummary, render_header, render_report, render_skip};
