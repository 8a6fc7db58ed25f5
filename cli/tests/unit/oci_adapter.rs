//! Tests for `OciCli`: argument lists, envelope parsing, error mapping.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;

use proxybox_cli::application::ports::{
    CommandRunner, ComputeApi, IdentityApi, LaunchSpec, NetworkApi, SecurityListSpec, ShapeConfig,
    SubnetSpec,
};
use proxybox_cli::domain::security::{sandbox_egress_rules, sandbox_ingress_rules};
use proxybox_cli::domain::{CloudError, LifecycleState, RouteRule, is_gone};
use proxybox_cli::infra::oci::OciCli;

// ── Mock runner ───────────────────────────────────────────────────────────────

/// Replays canned outputs and records every invocation.
#[derive(Default)]
struct ScriptedRunner {
    outputs: Mutex<VecDeque<Output>>,
    invocations: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedRunner {
    fn replying(outputs: Vec<Output>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            invocations: Mutex::new(Vec::new()),
        }
    }
}

impl CommandRunner for &ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.invocations.lock().unwrap().push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted output left"))
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.run(program, args).await
    }
}

fn ok(stdout: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

fn failed(code: i32, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

fn cli(runner: &ScriptedRunner) -> OciCli<&ScriptedRunner> {
    OciCli::new(runner, "oci", "/home/me/.oci/config", "CI")
}

fn args(runner: &ScriptedRunner, call: usize) -> Vec<String> {
    runner.invocations.lock().unwrap()[call].1.clone()
}

/// Value following `flag` in an argument list.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

const NOT_FOUND: &str = r#"ServiceError:
{
    "code": "NotAuthorizedOrNotFound",
    "message": "Authorization failed or requested resource not found.",
    "opc-request-id": "X",
    "status": 404
}
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn global_flags_precede_the_command() {
    let runner = ScriptedRunner::replying(vec![ok("")]);

    cli(&runner).list_vcns("ocid1.compartment..c").await.expect("list");

    let invocations = runner.invocations.lock().unwrap();
    assert_eq!(invocations[0].0, "oci");
    assert_eq!(
        invocations[0].1,
        vec![
            "--config-file",
            "/home/me/.oci/config",
            "--profile",
            "CI",
            "network",
            "vcn",
            "list",
            "--compartment-id",
            "ocid1.compartment..c",
            "--all",
        ]
    );
}

#[tokio::test]
async fn empty_output_is_an_empty_list() {
    let runner = ScriptedRunner::replying(vec![ok("\n")]);

    let instances = cli(&runner).list_instances("c").await.expect("list");

    assert!(instances.is_empty());
}

#[tokio::test]
async fn data_envelope_is_unwrapped() {
    let runner = ScriptedRunner::replying(vec![ok(r#"{
        "data": {
            "id": "ocid1.vcn.oc1..v",
            "display-name": "vcn-x1",
            "lifecycle-state": "AVAILABLE",
            "cidr-block": "10.0.0.0/16"
        },
        "etag": "abc"
    }"#)]);

    let vcn = cli(&runner).get_vcn("ocid1.vcn.oc1..v").await.expect("get");

    assert_eq!(vcn.display_name, "vcn-x1");
    assert_eq!(vcn.lifecycle_state, LifecycleState::Available);
    assert_eq!(
        &args(&runner, 0)[4..],
        &["network", "vcn", "get", "--vcn-id", "ocid1.vcn.oc1..v"]
    );
}

#[tokio::test]
async fn compartments_are_listed_across_the_subtree() {
    let runner = ScriptedRunner::replying(vec![ok(r#"{"data": [
        {"id": "ocid1.compartment..a", "name": "sandbox", "lifecycle-state": "ACTIVE"}
    ]}"#)]);

    let compartments = cli(&runner)
        .list_compartments("ocid1.tenancy..t")
        .await
        .expect("list");

    assert_eq!(compartments[0].name, "sandbox");
    let a = args(&runner, 0);
    assert_eq!(flag_value(&a, "--compartment-id"), Some("ocid1.tenancy..t"));
    assert_eq!(flag_value(&a, "--compartment-id-in-subtree"), Some("true"));
}

#[tokio::test]
async fn service_404_is_recognised_as_gone() {
    let runner = ScriptedRunner::replying(vec![failed(1, NOT_FOUND)]);

    let err = cli(&runner).get_subnet("ocid1.subnet..s").await.unwrap_err();

    assert!(is_gone(&err), "got: {err:#}");
    assert!(err.to_string().contains("oci network subnet get"), "got: {err}");
}

#[tokio::test]
async fn failure_without_service_error_keeps_stderr() {
    let runner =
        ScriptedRunner::replying(vec![failed(2, "Error: Missing option(s) --vcn-id.\n")]);

    let err = cli(&runner).delete_vcn("").await.unwrap_err();

    assert!(!is_gone(&err));
    match err.downcast_ref::<CloudError>() {
        Some(CloudError::Cli { code, stderr, .. }) => {
            assert_eq!(*code, 2);
            assert_eq!(stderr, "Error: Missing option(s) --vcn-id.");
        }
        other => panic!("expected Cli error, got {other:?}"),
    }
}

#[tokio::test]
async fn deletes_and_terminates_are_forced() {
    let runner = ScriptedRunner::replying(vec![ok(""), ok(""), ok("")]);
    let oci = cli(&runner);

    oci.terminate_instance("i").await.expect("terminate");
    oci.delete_internet_gateway("g").await.expect("delete");
    oci.delete_security_list("s").await.expect("delete");

    assert_eq!(
        &args(&runner, 0)[4..],
        &["compute", "instance", "terminate", "--instance-id", "i", "--force"]
    );
    assert_eq!(
        &args(&runner, 1)[4..],
        &["network", "internet-gateway", "delete", "--ig-id", "g", "--force"]
    );
    assert_eq!(
        &args(&runner, 2)[4..],
        &["network", "security-list", "delete", "--security-list-id", "s", "--force"]
    );
}

#[tokio::test]
async fn route_table_update_sends_json_rules() {
    let table = r#"{"data": {"id": "rt", "display-name": "Default Route Table for vcn-x1",
        "lifecycle-state": "AVAILABLE", "route-rules": []}}"#;
    let runner = ScriptedRunner::replying(vec![ok(table), ok(table)]);
    let oci = cli(&runner);

    oci.update_route_table("rt", &[RouteRule::internet("ig")])
        .await
        .expect("update");
    oci.update_route_table("rt", &[]).await.expect("reset");

    let set = args(&runner, 0);
    let rules: serde_json::Value =
        serde_json::from_str(flag_value(&set, "--route-rules").expect("rules")).expect("json");
    assert_eq!(rules[0]["networkEntityId"], "ig");
    assert_eq!(rules[0]["destination"], "0.0.0.0/0");
    assert!(set.contains(&"--force".to_string()));

    let reset = args(&runner, 1);
    assert_eq!(flag_value(&reset, "--route-rules"), Some("[]"));
}

#[tokio::test]
async fn security_rules_use_camel_case_json() {
    let runner = ScriptedRunner::replying(vec![ok(
        r#"{"data": {"id": "sl", "display-name": "sl-x1", "lifecycle-state": "PROVISIONING"}}"#,
    )]);
    let ingress = sandbox_ingress_rules(8443);
    let egress = sandbox_egress_rules();

    cli(&runner)
        .create_security_list(&SecurityListSpec {
            compartment_id: "c",
            vcn_id: "v",
            display_name: "sl-x1",
            ingress: &ingress,
            egress: &egress,
        })
        .await
        .expect("create");

    let a = args(&runner, 0);
    let ingress: serde_json::Value =
        serde_json::from_str(flag_value(&a, "--ingress-security-rules").expect("ingress"))
            .expect("json");
    assert_eq!(ingress[0]["tcpOptions"]["destinationPortRange"]["min"], 22);
    assert_eq!(ingress[1]["tcpOptions"]["destinationPortRange"]["max"], 8443);
    assert_eq!(ingress[2]["icmpOptions"]["type"], 3);
    assert_eq!(ingress[2]["icmpOptions"]["code"], 4);
    assert_eq!(ingress[0]["sourceType"], "CIDR_BLOCK");
    let egress: serde_json::Value =
        serde_json::from_str(flag_value(&a, "--egress-security-rules").expect("egress"))
            .expect("json");
    assert_eq!(egress[0]["protocol"], "all");
}

#[tokio::test]
async fn subnet_carries_security_lists_and_domain() {
    let runner = ScriptedRunner::replying(vec![ok(
        r#"{"data": {"id": "s", "display-name": "subnet-x1", "lifecycle-state": "PROVISIONING"}}"#,
    )]);
    let ids = ["ocid1.securitylist..a".to_string()];

    cli(&runner)
        .create_subnet(&SubnetSpec {
            compartment_id: "c",
            vcn_id: "v",
            display_name: "subnet-x1",
            cidr_block: "10.0.0.0/24",
            dns_label: "subnetx1",
            security_list_ids: &ids,
            availability_domain: "AD-1",
        })
        .await
        .expect("create");

    let a = args(&runner, 0);
    assert_eq!(
        flag_value(&a, "--security-list-ids"),
        Some(r#"["ocid1.securitylist..a"]"#)
    );
    assert_eq!(flag_value(&a, "--availability-domain"), Some("AD-1"));
    assert_eq!(flag_value(&a, "--dns-label"), Some("subnetx1"));
}

#[tokio::test]
async fn launch_sends_metadata_and_optional_shape_config() {
    let instance = r#"{"data": {"id": "i", "display-name": "proxy-x1",
        "lifecycle-state": "PROVISIONING", "time-created": "2025-03-01T10:00:00+00:00"}}"#;
    let runner = ScriptedRunner::replying(vec![ok(instance), ok(instance)]);
    let oci = cli(&runner);
    let metadata = BTreeMap::from([("user_data".to_string(), "I2Nsb3VkLWNvbmZpZwo=".to_string())]);
    let mut spec = LaunchSpec {
        compartment_id: "c",
        availability_domain: "AD-1",
        shape: "VM.Standard.E2.1.Micro",
        shape_config: ShapeConfig::default(),
        display_name: "proxy-x1",
        image_id: "img",
        subnet_id: "s",
        metadata: &metadata,
    };

    oci.launch_instance(&spec).await.expect("launch");
    spec.shape_config = ShapeConfig {
        ocpus: Some(2.0),
        memory_in_gbs: None,
    };
    oci.launch_instance(&spec).await.expect("launch");

    let fixed = args(&runner, 0);
    assert_eq!(
        flag_value(&fixed, "--metadata"),
        Some(r#"{"user_data":"I2Nsb3VkLWNvbmZpZwo="}"#)
    );
    assert_eq!(flag_value(&fixed, "--assign-public-ip"), Some("true"));
    assert!(!fixed.contains(&"--shape-config".to_string()));

    let flex = args(&runner, 1);
    assert_eq!(flag_value(&flex, "--shape-config"), Some(r#"{"ocpus":2.0}"#));
}

#[tokio::test]
async fn unparsable_output_names_the_operation() {
    let runner = ScriptedRunner::replying(vec![ok("not json")]);

    let err = cli(&runner).get_vnic("vnic").await.unwrap_err();

    assert!(err.to_string().contains("network vnic get"), "got: {err}");
}
