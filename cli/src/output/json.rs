//! JSON output helper used by every `--json` code path.

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty-print any serialisable value to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}
