//! Production implementation of the `CommandRunner` port.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;

/// Default timeout for one `oci` invocation.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(120);

/// Spawns processes on the tokio runtime with stdin closed and both output
/// streams captured.
///
/// The child is spawned with `kill_on_drop`, so when the timeout elapses and
/// the pending wait is dropped the process is killed rather than orphaned.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, "spawning");
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow::anyhow!("{program} timed out after {}s", timeout.as_secs()))?
            .with_context(|| format!("waiting for {program}"))?;
        tracing::debug!(program, status = %output.status, "finished");
        Ok(output)
    }
}
