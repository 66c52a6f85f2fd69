//! `check` command handler.

use chrono::Local;
use fragcheck_core::{CoreError, Findings, RequestReport};

use crate::bootstrap::CliContext;
use crate::commands::{CheckArgs, OutputFormat};
use crate::error::CliError;
use crate::presentation::{RunSummary, render_header, render_report};

/// Reports of a run and the exit code it ends with.
#[derive(Debug)]
pub struct CheckRun {
    pub reports: Vec<RequestReport>,
    pub exit_code: u8,
}

/// Report standing in for a request that could not be checked at all.
///
/// Counts as one error, so the run stops here unless validation is bypassed.
fn unavailable_report(prepid: &str, err: &CoreError) -> RequestReport {
    let mut findings = Findings::new();
    let message = match err {
        CoreError::Mcm(_) => "Something's wrong - can not get the request parameters",
        _ => "Request could not be checked",
    };
    findings.error(message).detail(err.to_string());
    RequestReport::checked(prepid, "", "unknown", findings)
}

/// Check `prepids` in order.
///
/// Without `bypass_validation` the run stops at the first request with
/// errors and exits with its error count; with it every request is checked
/// and the exit code is 0.
pub async fn run(
    ctx: &CliContext,
    prepids: &[String],
    bypass_validation: bool,
    mut on_report: impl FnMut(&RequestReport),
) -> CheckRun {
    let mut reports = Vec::with_capacity(prepids.len());
    let mut exit_code = 0;

    for prepid in prepids {
        let report = match ctx.validator.validate(prepid).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(%prepid, "Cannot check request: {e}");
                unavailable_report(prepid, &e)
            }
        };
        on_report(&report);

        let code = report.exit_code();
        reports.push(report);
        if code > 0 && !bypass_validation {
            exit_code = code;
            break;
        }
    }

    CheckRun { reports, exit_code }
}

/// Execute the check command.
pub async fn execute(ctx: &CliContext, args: &CheckArgs) -> Result<u8, CliError> {
    let selected = ctx
        .selector
        .select(&args.prepid, args.ticket.as_deref())
        .await?;
    let now = Local::now();

    match args.format {
        OutputFormat::Text => {
            print!(
                "{}",
                render_header(&args.prepid, args.ticket.as_deref(), &selected, now, ctx.dev)
            );
            let run = run(ctx, &selected, args.bypass_validation, |report| {
                print!("{}", render_report(report));
            })
            .await;
            Ok(run.exit_code)
        }
        OutputFormat::Json => {
            let run = run(ctx, &selected, args.bypass_validation, |_| {}).await;
            let summary = RunSummary {
                checked_at: now,
                dev: ctx.dev,
                ticket: args.ticket.clone(),
                prepids: selected,
                reports: run.reports,
                exit_code: run.exit_code,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(summary.exit_code)
        }
    }
}
