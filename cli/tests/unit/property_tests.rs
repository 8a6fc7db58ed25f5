//! Property-based tests for the age filter and name conventions.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use proxybox_cli::domain::age::format_running_time;
use proxybox_cli::domain::{
    Instance, LifecycleState, SandboxNames, long_running, reapable_suffixes,
    suffix_from_instance_name, validate_suffix,
};

fn running(name: &str, age_secs: i64) -> Instance {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Instance {
        id: format!("ocid1.instance..{name}"),
        display_name: name.to_string(),
        lifecycle_state: LifecycleState::Running,
        time_created: now - Duration::seconds(age_secs),
    }
}

/// Inverse of `format_running_time`, for checking it loses nothing.
fn parse_running_time(s: &str) -> i64 {
    let (days, clock) = match s.split_once(", ") {
        Some((d, clock)) => (d.split(' ').next().unwrap().parse::<i64>().unwrap(), clock),
        None => (0, s),
    };
    let parts: Vec<i64> = clock.split(':').map(|p| p.parse().unwrap()).collect();
    days * 86_400 + parts[0] * 3_600 + parts[1] * 60 + parts[2]
}

// ============================================================================
// Age filter
// ============================================================================

proptest! {
    /// A running instance is a candidate exactly when its age reaches the threshold.
    #[test]
    fn prop_candidate_iff_age_reaches_threshold(
        age in 0i64..400_000,
        threshold in 0i64..400_000,
    ) {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let found = long_running(&[running("proxy-a", age)], now, threshold);
        prop_assert_eq!(found.len() == 1, age >= threshold);
        if let Some(c) = found.first() {
            prop_assert_eq!(c.running_time_seconds, age);
        }
    }

    /// The formatted running time always parses back to the same number of seconds.
    #[test]
    fn prop_running_time_format_is_lossless(secs in 0i64..10_000_000) {
        prop_assert_eq!(parse_running_time(&format_running_time(secs)), secs);
    }

    /// Raising the threshold never adds candidates.
    #[test]
    fn prop_threshold_is_monotonic(
        ages in proptest::collection::vec(0i64..200_000, 0..12),
        low in 0i64..100_000,
        extra in 0i64..100_000,
    ) {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let instances: Vec<Instance> = ages
            .iter()
            .enumerate()
            .map(|(i, age)| running(&format!("proxy-{i}"), *age))
            .collect();
        let loose = long_running(&instances, now, low);
        let strict = long_running(&instances, now, low + extra);
        prop_assert!(strict.len() <= loose.len());
        prop_assert!(strict.iter().all(|c| loose.contains(c)));
    }
}

// ============================================================================
// Naming
// ============================================================================

proptest! {
    /// Every valid suffix survives the trip through the instance name.
    #[test]
    fn prop_valid_suffix_round_trips(suffix in "[A-Za-z0-9][A-Za-z0-9-]{0,31}") {
        prop_assert!(validate_suffix(&suffix).is_ok());
        let names = SandboxNames::new(&suffix);
        prop_assert_eq!(suffix_from_instance_name(&names.instance), Some(suffix.as_str()));
    }

    /// Suffixes with characters outside the allowed set are rejected.
    #[test]
    fn prop_suffix_with_forbidden_char_rejected(
        head in "[a-z0-9]{1,8}",
        bad in "[ _./:@]",
    ) {
        let suffix = format!("{head}{bad}");
        prop_assert!(validate_suffix(&suffix).is_err(), "accepted: {suffix}");
    }

    /// Names that do not start with `proxy-` are never reaped.
    #[test]
    fn prop_foreign_names_not_reapable(name in "[a-oq-z][a-z0-9-]{0,20}") {
        let found = long_running(
            &[running(&name, 10_000)],
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            0,
        );
        prop_assert!(reapable_suffixes(&found).is_empty());
    }
}

#[test]
fn leading_hyphen_is_rejected() {
    assert!(validate_suffix("-x1").is_err());
    assert!(validate_suffix("").is_err());
}

#[test]
fn suffix_longer_than_32_is_rejected() {
    assert!(validate_suffix(&"a".repeat(32)).is_ok());
    assert!(validate_suffix(&"a".repeat(33)).is_err());
}
