//! Domain types and validators for proxybox configuration.
//!
//! No I/O here; loading lives in `infra::config`.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, InputError};

// ── Settings schema ──────────────────────────────────────────────────────────

/// Top-level settings stored in `~/.proxybox/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProxyboxConfig {
    pub oci: OciSettings,
    pub network: NetworkSettings,
    pub wait: WaitSettings,
}

/// How the `oci` tool is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OciSettings {
    /// Program name or path.
    pub binary: String,
    /// Per-invocation timeout.
    pub command_timeout_secs: u64,
}

impl Default for OciSettings {
    fn default() -> Self {
        Self {
            binary: "oci".to_string(),
            command_timeout_secs: 120,
        }
    }
}

/// Address space of a sandbox network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub vcn_cidr: String,
    pub subnet_cidr: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            vcn_cidr: "10.0.0.0/16".to_string(),
            subnet_cidr: "10.0.0.0/24".to_string(),
        }
    }
}

/// Polling behaviour of the wait primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitSettings {
    pub poll_interval_secs: u64,
    /// Networking resources, and every deletion.
    pub resource_timeout_secs: u64,
    /// Instance launch.
    pub instance_timeout_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            resource_timeout_secs: 300,
            instance_timeout_secs: 600,
        }
    }
}

/// Bounds for one wait: how long in total and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitSettings {
    #[must_use]
    pub fn resource_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_secs(self.resource_timeout_secs),
            interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    #[must_use]
    pub fn instance_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_secs(self.instance_timeout_secs),
            interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates loaded settings.
///
/// # Errors
///
/// Returns an error if the binary is empty, a CIDR is malformed, or any
/// timeout/interval is zero.
pub fn validate_config(cfg: &ProxyboxConfig) -> Result<()> {
    if cfg.oci.binary.trim().is_empty() {
        return Err(invalid("oci.binary", "", "Must name the oci executable."));
    }
    for (key, value) in [
        ("network.vcn_cidr", &cfg.network.vcn_cidr),
        ("network.subnet_cidr", &cfg.network.subnet_cidr),
    ] {
        if !is_ipv4_cidr(value) {
            return Err(invalid(key, value, "Expected an IPv4 CIDR such as 10.0.0.0/16."));
        }
    }
    for (key, value) in [
        ("oci.command_timeout_secs", cfg.oci.command_timeout_secs),
        ("wait.poll_interval_secs", cfg.wait.poll_interval_secs),
        ("wait.resource_timeout_secs", cfg.wait.resource_timeout_secs),
        ("wait.instance_timeout_secs", cfg.wait.instance_timeout_secs),
    ] {
        if value == 0 {
            return Err(invalid(key, "0", "Must be greater than zero."));
        }
    }
    Ok(())
}

fn invalid(key: &str, value: &str, hint: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}

fn is_ipv4_cidr(s: &str) -> bool {
    let Some((addr, prefix)) = s.split_once('/') else {
        return false;
    };
    addr.parse::<std::net::Ipv4Addr>().is_ok() && prefix.parse::<u8>().is_ok_and(|p| p <= 32)
}

// ── OCI config file ──────────────────────────────────────────────────────────

/// Section every other profile inherits from.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Looks up `key` in `[profile]` of an OCI config file (INI format).
///
/// As in the provider's own tooling, every profile inherits keys from
/// `[DEFAULT]`; a value in the named section wins. Lines starting with `#`
/// or `;` are comments; keys and values are trimmed.
///
/// # Errors
///
/// Returns [`InputError::MissingProfile`] when `[profile]` does not exist, or
/// [`InputError::MissingKey`] when neither it nor `[DEFAULT]` has `key`.
pub fn oci_profile_value(contents: &str, path: &str, profile: &str, key: &str) -> Result<String> {
    let mut section = "";
    let mut saw_profile = false;
    let mut own = None;
    let mut inherited = None;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = name.trim();
            saw_profile |= section == profile;
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        if k.trim() != key {
            continue;
        }
        if section == profile {
            own.get_or_insert_with(|| v.trim().to_string());
        } else if section == DEFAULT_PROFILE {
            inherited.get_or_insert_with(|| v.trim().to_string());
        }
    }
    if !saw_profile {
        return Err(InputError::MissingProfile {
            profile: profile.to_string(),
            path: path.to_string(),
        }
        .into());
    }
    own.or(inherited).ok_or_else(|| {
        InputError::MissingKey {
            key: key.to_string(),
            profile: profile.to_string(),
        }
        .into()
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
