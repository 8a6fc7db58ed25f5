//! `proxybox start`: build a sandbox and save its public IP.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ShapeConfig;
use crate::application::services::provision::{ProvisionRequest, ProvisionedSandbox, provision};
use crate::commands::{CloudArgs, open_session};
use crate::domain::{SandboxNames, validate_suffix};
use crate::infra::fs;
use crate::output::{OutputContext, json};

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub cloud: CloudArgs,

    /// Name of the availability domain
    #[arg(long)]
    pub availability_domain: String,

    /// Suffix for all the generated names
    #[arg(long)]
    pub name_suffix: String,

    /// TCP port to open to the world, next to SSH
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub open_port: u16,

    /// Compute shape
    #[arg(long)]
    pub shape: String,

    /// OCPUs for a flexible shape
    #[arg(long)]
    pub shape_ocpus: Option<f32>,

    /// Memory in GB for a flexible shape
    #[arg(long)]
    pub shape_memory_in_gbs: Option<f32>,

    /// Operating system of the image
    #[arg(long)]
    pub os_name: String,

    /// Operating system version of the image
    #[arg(long)]
    pub os_version: String,

    /// SSH public key file to authorise on the instance
    #[arg(long, value_name = "PATH")]
    pub ssh_public_key: Option<PathBuf>,

    /// Path to the cloud-init script
    #[arg(long, value_name = "PATH")]
    pub cloud_init: PathBuf,

    /// File to write the instance's public IP to
    #[arg(long, value_name = "PATH")]
    pub save_ip_address_to: PathBuf,
}

/// Run `proxybox start`.
///
/// # Errors
///
/// Returns an error if an input is invalid or any provisioning step fails.
/// Resources created before the failure are left for `proxybox stop`.
pub async fn run(args: &StartArgs, app: &AppContext) -> Result<()> {
    validate_suffix(&args.name_suffix)?;
    let cloud_init = fs::read_cloud_init(&args.cloud_init)?;
    let ssh_public_key = args
        .ssh_public_key
        .as_deref()
        .map(fs::read_ssh_public_key)
        .transpose()?;

    let session = open_session(app, &args.cloud).await?;
    let names = SandboxNames::new(&args.name_suffix);
    let reporter = app.terminal_reporter();

    let sandbox = provision(
        &session.cloud,
        &ProvisionRequest {
            compartment_id: &session.compartment_id,
            availability_domain: &args.availability_domain,
            names: &names,
            open_port: args.open_port,
            shape: &args.shape,
            shape_config: ShapeConfig {
                ocpus: args.shape_ocpus,
                memory_in_gbs: args.shape_memory_in_gbs,
            },
            os_name: &args.os_name,
            os_version: &args.os_version,
            cloud_init: &cloud_init,
            ssh_public_key: ssh_public_key.as_deref(),
        },
        &app.settings.network,
        &app.settings.wait,
        &reporter,
    )
    .await?;

    fs::write_ip_address(&args.save_ip_address_to, &sandbox.public_ip)?;
    tracing::info!(
        ip = %sandbox.public_ip,
        path = %args.save_ip_address_to.display(),
        "saved public IP"
    );

    if app.is_json() {
        json::print(&sandbox)?;
    } else {
        print_summary(&names, &sandbox, &app.output);
    }
    Ok(())
}

fn print_summary(names: &SandboxNames, sandbox: &ProvisionedSandbox, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    println!();
    ctx.success(&format!("Sandbox {} is up.", names.suffix));
    ctx.kv("Instance", &sandbox.instance_id);
    ctx.kv("Public IP", &sandbox.public_ip);
    ctx.kv("Tear down", &format!("proxybox stop --name-suffix {}", names.suffix));
}
