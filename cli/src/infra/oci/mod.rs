//! Infrastructure implementation of the cloud port traits on top of the
//! `oci` command-line tool.
//!
//! `OciCli<R>` routes every call through a `CommandRunner`, always with
//! `--config-file` and `--profile` in front, and unwraps the tool's
//! `{"data": ...}` JSON envelope. A failed call whose stderr carries a
//! `ServiceError` block becomes a typed [`CloudError::Service`] so callers
//! can tell a `404` from everything else.

mod compute;
mod identity;
mod network;

use std::process::Output;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::CommandRunner;
use crate::domain::CloudError;

/// Adapter that speaks to OCI through the `oci` executable.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct OciCli<R: CommandRunner> {
    runner: R,
    binary: String,
    config_file: String,
    profile: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    status: u16,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl<R: CommandRunner> OciCli<R> {
    pub fn new(
        runner: R,
        binary: impl Into<String>,
        config_file: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            config_file: config_file.into(),
            profile: profile.into(),
        }
    }

    /// Runs `oci <global flags> <args>` and fails on a non-zero exit.
    async fn exec(&self, args: &[&str]) -> Result<Output> {
        let mut full = vec![
            "--config-file",
            self.config_file.as_str(),
            "--profile",
            self.profile.as_str(),
        ];
        full.extend_from_slice(args);

        let operation = operation_name(args);
        let output = self
            .runner
            .run(&self.binary, &full)
            .await
            .with_context(|| format!("failed to run oci {operation}"))?;
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let err = parse_service_error(&stderr).unwrap_or_else(|| CloudError::Cli {
            program: self.binary.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
        Err(anyhow::Error::new(err).context(format!("oci {operation}")))
    }

    /// Runs a command whose `data` is a single object.
    async fn data<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let output = self.exec(args).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("invalid JSON from oci {}", operation_name(args)))?;
        Ok(envelope.data)
    }

    /// Runs a list command. The tool prints nothing at all for an empty list.
    async fn list<T: DeserializeOwned>(&self, args: &[&str]) -> Result<Vec<T>> {
        let output = self.exec(args).await?;
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let envelope: Envelope<Vec<T>> = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("invalid JSON from oci {}", operation_name(args)))?;
        Ok(envelope.data)
    }

    /// Runs a command whose output is irrelevant (deletes).
    async fn unit(&self, args: &[&str]) -> Result<()> {
        self.exec(args).await.map(|_| ())
    }
}

/// `["network", "vcn", "get", "--vcn-id", ..]` → `"network vcn get"`.
fn operation_name(args: &[&str]) -> String {
    args.iter()
        .take_while(|a| !a.starts_with("--"))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the JSON body of a `ServiceError:` block from the tool's stderr.
#[must_use]
pub fn parse_service_error(stderr: &str) -> Option<CloudError> {
    let after = &stderr[stderr.find("ServiceError")?..];
    let body = &after[after.find('{')?..];
    let parsed = serde_json::Deserializer::from_str(body)
        .into_iter::<ServiceErrorBody>()
        .next()?
        .ok()?;
    Some(CloudError::Service {
        status: parsed.status,
        code: parsed.code,
        message: parsed.message,
    })
}

/// Serialises a complex-type argument for the tool.
fn json_arg<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("serializing oci argument")
}
