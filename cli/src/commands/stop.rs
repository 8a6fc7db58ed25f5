//! `proxybox stop`: tear down one sandbox by its name suffix.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::decommission::{InstanceOutcome, TeardownReport, decommission};
use crate::commands::{CloudArgs, open_session};
use crate::domain::validate_suffix;
use crate::output::{OutputContext, json};

/// Arguments for the stop command.
#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub cloud: CloudArgs,

    /// Suffix the sandbox was started with
    #[arg(long)]
    pub name_suffix: String,
}

/// Run `proxybox stop`.
///
/// # Errors
///
/// Returns an error if the VCN or subnet cannot be found or a network
/// deletion fails. A missing or stuck instance only produces a warning.
pub async fn run(args: &StopArgs, app: &AppContext) -> Result<()> {
    validate_suffix(&args.name_suffix)?;
    let session = open_session(app, &args.cloud).await?;
    let reporter = app.terminal_reporter();

    let report = decommission(
        &session.cloud,
        &session.compartment_id,
        &args.name_suffix,
        &app.settings.wait,
        &reporter,
    )
    .await?;

    if app.is_json() {
        json::print(&report)?;
    } else {
        print_summary(&report, &app.output);
    }
    Ok(())
}

fn print_summary(report: &TeardownReport, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    println!();
    match &report.instance {
        InstanceOutcome::Terminated { .. } => {
            ctx.success(&format!("Sandbox {} removed.", report.suffix));
        }
        InstanceOutcome::Failed { .. } => {
            ctx.warn(&format!(
                "Sandbox {} network removed; the instance was not terminated.",
                report.suffix
            ));
        }
    }
}
