//! Age filtering for the reaper.
//!
//! `now` is always passed in so the filter stays a pure function.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::naming::suffix_from_instance_name;
use crate::domain::resource::{Instance, LifecycleState};

/// A running instance that has outlived the allowed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongRunningInstance {
    pub name: String,
    pub id: String,
    pub running_time_seconds: i64,
    pub running_time_formatted: String,
}

/// Running instances whose age is at least `max_duration_secs`.
///
/// Instances in any state other than `RUNNING` are skipped.
#[must_use]
pub fn long_running(
    instances: &[Instance],
    now: DateTime<Utc>,
    max_duration_secs: i64,
) -> Vec<LongRunningInstance> {
    instances
        .iter()
        .filter(|i| i.lifecycle_state == LifecycleState::Running)
        .filter_map(|i| {
            let running = (now - i.time_created).num_seconds();
            (running >= max_duration_secs).then(|| LongRunningInstance {
                name: i.display_name.clone(),
                id: i.id.clone(),
                running_time_seconds: running,
                running_time_formatted: format_running_time(running),
            })
        })
        .collect()
}

/// Suffixes of the candidates that follow the `proxy-<suffix>` convention,
/// each once, in first-seen order. Anything else is not ours to tear down.
#[must_use]
pub fn reapable_suffixes(candidates: &[LongRunningInstance]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    candidates
        .iter()
        .filter_map(|c| suffix_from_instance_name(&c.name))
        .filter(|suffix| seen.insert(*suffix))
        .map(str::to_string)
        .collect()
}

/// `H:MM:SS`, with a day prefix once the duration passes 24h.
#[must_use]
pub fn format_running_time(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        d => format!("{d} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
