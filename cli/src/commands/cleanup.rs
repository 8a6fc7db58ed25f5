//! `proxybox cleanup`: reap every sandbox running longer than a limit.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::reaper::{ReapReport, reap};
use crate::commands::{CloudArgs, open_session};
use crate::output::{OutputContext, json};

/// Arguments for the cleanup command.
#[derive(Args, Debug)]
pub struct CleanupArgs {
    #[command(flatten)]
    pub cloud: CloudArgs,

    /// Maximum run time after which an instance is eligible for cleanup
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub max_duration_secs: i64,
}

/// Run `proxybox cleanup`.
///
/// # Errors
///
/// Returns an error if instances cannot be listed, or after all sandboxes
/// were attempted if any of them could not be torn down.
pub async fn run(args: &CleanupArgs, app: &AppContext) -> Result<()> {
    let session = open_session(app, &args.cloud).await?;
    let reporter = app.terminal_reporter();

    let report = reap(
        &session.cloud,
        &session.compartment_id,
        args.max_duration_secs,
        chrono::Utc::now(),
        &app.settings.wait,
        &reporter,
    )
    .await?;

    if app.is_json() {
        json::print(&report)?;
    } else {
        print_summary(&report, &app.output);
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} sandboxes could not be torn down",
            report.outcomes.len()
        );
    }
    Ok(())
}

fn print_summary(report: &ReapReport, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    println!();
    if report.candidates.is_empty() {
        ctx.success(&format!(
            "No instance has been running for {}s or more.",
            report.max_duration_secs
        ));
        return;
    }
    ctx.title("Long-running instances");
    for c in &report.candidates {
        ctx.kv(&c.name, &format!("{} ({})", c.running_time_formatted, c.id));
    }
    println!();
    for outcome in &report.outcomes {
        match &outcome.error {
            None => ctx.success(&format!("{} removed", outcome.suffix)),
            Some(error) => ctx.error(&format!("{}: {error}", outcome.suffix)),
        }
    }
}
