//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Short-lived OCI proxy sandboxes
#[derive(Parser)]
#[command(
    name = "proxybox",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// More diagnostics on stderr (-v info, -vv debug); `RUST_LOG` overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a sandbox: network, firewall, subnet and one instance
    Start(commands::start::StartArgs),

    /// Tear down the sandbox with the given name suffix
    Stop(commands::stop::StopArgs),

    /// Tear down every sandbox running longer than a limit
    Cleanup(commands::cleanup::CleanupArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        if let Command::Version = command {
            return commands::version::run(json);
        }

        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Start(args) => commands::start::run(&args, &app).await,
            Command::Stop(args) => commands::stop::run(&args, &app).await,
            Command::Cleanup(args) => commands::cleanup::run(&args, &app).await,
            Command::Version => Ok(()),
        }
    }
}
