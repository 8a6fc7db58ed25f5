//! `proxybox version`

use anyhow::Result;

use crate::output::json;

/// Prints the crate version, as `{"version": ...}` under `--json`.
///
/// # Errors
///
/// Returns an error only if stdout cannot be written in JSON mode.
pub fn run(as_json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if as_json {
        return json::print(&serde_json::json!({ "version": version }));
    }
    println!("proxybox {version}");
    Ok(())
}
