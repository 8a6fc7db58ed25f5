//! Tests for tearing down one sandbox by suffix.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{Duration, Utc};

use proxybox_cli::application::services::decommission::{InstanceOutcome, decommission};
use proxybox_cli::domain::LifecycleState;
use proxybox_cli::domain::config::WaitSettings;

use crate::fake_cloud::{COMPARTMENT_ID, FakeCloud, RecordingReporter};

fn sandbox(suffix: &str) -> FakeCloud {
    FakeCloud::new().with_sandbox(suffix, Utc::now() - Duration::hours(2))
}

#[tokio::test]
async fn tears_down_leaves_before_roots() {
    let cloud = sandbox("x1");
    let reporter = RecordingReporter::default();

    decommission(&cloud, COMPARTMENT_ID, "x1", &WaitSettings::default(), &reporter)
        .await
        .expect("decommission");

    assert_eq!(
        cloud.mutations(),
        vec![
            "terminate_instance proxy-x1",
            "delete_subnet subnet-x1",
            "update_route_table Default Route Table for vcn-x1",
            "delete_security_list sl-x1",
            "delete_internet_gateway ig-x1",
            "delete_vcn vcn-x1",
        ]
    );
    assert!(cloud.vcn_names().is_empty());
    assert!(cloud.subnet_names().is_empty());
    assert_eq!(
        cloud.instance_state("proxy-x1"),
        Some(LifecycleState::Terminated)
    );
}

#[tokio::test]
async fn report_lists_every_removed_resource() {
    let cloud = sandbox("x1");
    let instance_id = cloud.id_of("proxy-x1").expect("instance");
    let subnet_id = cloud.id_of("subnet-x1").expect("subnet");
    let sl_id = cloud.id_of("sl-x1").expect("security list");
    let ig_id = cloud.id_of("ig-x1").expect("gateway");
    let vcn_id = cloud.id_of("vcn-x1").expect("vcn");

    let report = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    assert_eq!(report.suffix, "x1");
    assert_eq!(report.instance, InstanceOutcome::Terminated { id: instance_id });
    assert_eq!(report.subnet_id, subnet_id);
    assert_eq!(report.security_lists_deleted, vec![sl_id]);
    assert_eq!(report.gateways_deleted, vec![ig_id]);
    assert_eq!(report.route_tables_cleared.len(), 1);
    assert_eq!(report.vcn_id, vcn_id);
}

#[tokio::test]
async fn missing_instance_does_not_stop_network_teardown() {
    let cloud = FakeCloud::new().with_network("x1");
    let reporter = RecordingReporter::default();

    let report = decommission(&cloud, COMPARTMENT_ID, "x1", &WaitSettings::default(), &reporter)
        .await
        .expect("decommission");

    match &report.instance {
        InstanceOutcome::Failed { error } => {
            assert!(error.contains("Instance 'proxy-x1' not found."), "got: {error}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(reporter.warnings().len(), 1);
    assert!(cloud.vcn_names().is_empty());
}

#[tokio::test]
async fn termination_failure_does_not_stop_network_teardown() {
    let cloud = sandbox("x1");
    cloud.fail("terminate_instance", 500);

    let report = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    assert!(matches!(report.instance, InstanceOutcome::Failed { .. }));
    assert!(cloud.mutations().contains(&"delete_vcn vcn-x1".to_string()));
    assert!(cloud.vcn_names().is_empty());
}

#[tokio::test]
async fn terminated_instance_with_same_name_is_skipped() {
    let cloud = sandbox("x1").with_instance(
        "proxy-x1",
        LifecycleState::Terminated,
        Utc::now() - Duration::days(3),
    );
    let live_id = cloud.id_of("proxy-x1").expect("instance");

    let report = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    assert_eq!(report.instance, InstanceOutcome::Terminated { id: live_id });
}

#[tokio::test]
async fn subnet_already_gone_counts_as_deleted() {
    let cloud = sandbox("x1");
    cloud.fail_after("delete_subnet", 404);

    decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("404 on delete is success");

    assert!(cloud.vcn_names().is_empty());
}

#[tokio::test]
async fn route_tables_are_reset_to_no_rules() {
    let cloud = sandbox("x1");
    assert_eq!(cloud.route_rules_of("Default Route Table for vcn-x1").len(), 1);

    decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    let updates = cloud.route_updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "Default Route Table for vcn-x1");
    assert!(updates[0].1.is_empty());
}

#[tokio::test]
async fn empty_route_tables_are_not_updated() {
    let cloud = sandbox("x1");
    cloud.clear_route_rules();

    let report = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    assert!(report.route_tables_cleared.is_empty());
    assert!(!cloud.mutations().iter().any(|c| c.starts_with("update_route_table")));
}

#[tokio::test]
async fn default_security_list_is_never_deleted() {
    let cloud = sandbox("x1");

    decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    let deletes: Vec<String> = cloud
        .mutations()
        .into_iter()
        .filter(|c| c.starts_with("delete_security_list"))
        .collect();
    assert_eq!(deletes, vec!["delete_security_list sl-x1"]);
}

#[tokio::test]
async fn other_sandboxes_are_untouched() {
    let cloud = sandbox("x1").with_sandbox("x2", Utc::now());

    decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .expect("decommission");

    assert_eq!(cloud.vcn_names(), vec!["vcn-x2"]);
    assert_eq!(cloud.subnet_names(), vec!["subnet-x2"]);
    assert_eq!(cloud.instance_state("proxy-x2"), Some(LifecycleState::Running));
}

#[tokio::test]
async fn missing_vcn_is_fatal() {
    let cloud = FakeCloud::new();

    let err = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("VCN 'vcn-x1' not found."), "got: {err:#}");
}

#[tokio::test]
async fn network_deletion_failure_is_fatal() {
    let cloud = sandbox("x1");
    cloud.fail("delete_internet_gateway", 500);

    let err = decommission(
        &cloud,
        COMPARTMENT_ID,
        "x1",
        &WaitSettings::default(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("deleting ig-x1"), "got: {err:#}");
    assert_eq!(cloud.vcn_names(), vec!["vcn-x1"]);
}
