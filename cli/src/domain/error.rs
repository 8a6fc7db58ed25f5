//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::resource::LifecycleState;

// ── Cloud errors ──────────────────────────────────────────────────────────────

/// Errors raised while talking to the cloud provider or waiting on it.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("{kind} '{name}' not found.")]
    NotFound { kind: &'static str, name: String },

    #[error("service error {status} ({code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("timed out after {}s waiting for {resource} to reach {target}", waited.as_secs())]
    Timeout {
        resource: String,
        target: LifecycleState,
        waited: Duration,
    },

    #[error("{program} failed (exit {code}): {stderr}")]
    Cli {
        program: String,
        code: i32,
        stderr: String,
    },
}

impl CloudError {
    /// `true` for a provider `404`, i.e. the resource no longer exists.
    #[must_use]
    pub fn is_not_found_status(&self) -> bool {
        matches!(self, Self::Service { status: 404, .. })
    }
}

/// Walks an `anyhow` chain looking for a provider `404`.
///
/// Adapters wrap `CloudError` in `.context(...)`, so a plain
/// `downcast_ref` on the outer error is not enough.
#[must_use]
pub fn is_gone(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<CloudError>())
        .any(CloudError::is_not_found_status)
}

// ── Input errors ──────────────────────────────────────────────────────────────

/// Errors related to caller-supplied values.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(
        "Invalid name suffix '{0}': must match ^[A-Za-z0-9][A-Za-z0-9-]{{0,31}}$"
    )]
    InvalidSuffix(String),

    #[error("Profile '{profile}' not found in {path}")]
    MissingProfile { profile: String, path: String },

    #[error("Key '{key}' missing from profile '{profile}'")]
    MissingKey { key: String, profile: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the proxybox settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
