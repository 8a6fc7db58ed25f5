//! proxybox - short-lived OCI proxy sandboxes

use clap::Parser;

use proxybox_cli::cli::Cli;
use proxybox_cli::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
