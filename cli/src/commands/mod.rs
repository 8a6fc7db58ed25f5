//! Command implementations

pub mod cleanup;
pub mod start;
pub mod stop;
pub mod version;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lookup;
use crate::domain::config::DEFAULT_PROFILE;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{expand_home, read_tenancy};
use crate::infra::oci::OciCli;

/// Connection arguments shared by every cloud command.
#[derive(Args, Debug, Clone)]
pub struct CloudArgs {
    /// Location of the OCI config file
    #[arg(long, value_name = "PATH")]
    pub config_file: String,

    /// Name of the compartment
    #[arg(long)]
    pub compartment_name: String,

    /// Profile to use from the OCI config file
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,
}

/// An adapter bound to one config profile, and the compartment it targets.
pub struct Session {
    pub cloud: OciCli<TokioCommandRunner>,
    pub compartment_id: String,
}

/// Reads the tenancy from the OCI config and resolves the compartment name.
///
/// # Errors
///
/// Returns an error if the config file or profile is unusable, or no active
/// compartment has the given name.
pub async fn open_session(app: &AppContext, args: &CloudArgs) -> Result<Session> {
    let config_file = expand_home(&args.config_file)?;
    let tenancy_id = read_tenancy(&config_file, &args.profile)?;
    let cloud = app.cloud(&config_file, &args.profile);
    let compartment_id =
        lookup::compartment_id(&cloud, &tenancy_id, &args.compartment_name).await?;
    tracing::info!(
        compartment = %args.compartment_name,
        %compartment_id,
        "resolved compartment"
    );
    Ok(Session {
        cloud,
        compartment_id,
    })
}
