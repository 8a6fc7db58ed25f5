//! Tear down every sandbox whose instance has been running too long.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::{CloudProvider, ProgressReporter};
use crate::application::services::decommission::{TeardownReport, decommission};
use crate::domain::config::WaitSettings;
use crate::domain::{LongRunningInstance, long_running, reapable_suffixes};

/// Result of tearing down one sandbox.
#[derive(Debug, Clone, Serialize)]
pub struct SuffixOutcome {
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown: Option<TeardownReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuffixOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReapReport {
    pub max_duration_secs: i64,
    pub candidates: Vec<LongRunningInstance>,
    pub outcomes: Vec<SuffixOutcome>,
}

impl ReapReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

/// Lists `RUNNING` instances older than `max_duration_secs` and decommissions
/// each sandbox they belong to. A failed teardown is recorded and the next
/// suffix is attempted.
///
/// # Errors
///
/// Returns an error only if the instance listing itself fails.
pub async fn reap(
    cloud: &impl CloudProvider,
    compartment_id: &str,
    max_duration_secs: i64,
    now: DateTime<Utc>,
    waits: &WaitSettings,
    reporter: &impl ProgressReporter,
) -> Result<ReapReport> {
    let instances = cloud
        .list_instances(compartment_id)
        .await
        .context("listing instances")?;
    let candidates = long_running(&instances, now, max_duration_secs);
    let suffixes = reapable_suffixes(&candidates);
    tracing::info!(?suffixes, "sandboxes past max duration");

    let mut outcomes = Vec::with_capacity(suffixes.len());
    for suffix in suffixes {
        reporter.step(&format!("tearing down sandbox {suffix}..."));
        let outcome = match decommission(cloud, compartment_id, &suffix, waits, reporter).await {
            Ok(report) => {
                reporter.success(&format!("sandbox {suffix} removed"));
                SuffixOutcome {
                    suffix,
                    teardown: Some(report),
                    error: None,
                }
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::warn!(%suffix, %error, "teardown failed, continuing");
                reporter.warn(&format!("tearing down {suffix} failed: {error}.. continuing"));
                SuffixOutcome {
                    suffix,
                    teardown: None,
                    error: Some(error),
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(ReapReport {
        max_duration_secs,
        candidates,
        outcomes,
    })
}
