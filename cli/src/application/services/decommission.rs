//! Tear down one sandbox, leaves before roots.
//!
//! Order: instance, subnet, route-table rules, non-default security lists,
//! internet gateways, VCN. The provider refuses to delete a VCN while
//! anything still references it.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{CloudProvider, ComputeApi, NetworkApi, ProgressReporter};
use crate::application::services::lookup;
use crate::application::services::wait::delete_and_wait;
use crate::domain::config::WaitSettings;
use crate::domain::naming::default_security_list_name;
use crate::domain::{SandboxNames, Vcn, WaitPolicy};

/// What happened to the instance during teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstanceOutcome {
    Terminated { id: String },
    Failed { error: String },
}

/// Everything a teardown removed.
#[derive(Debug, Clone, Serialize)]
pub struct TeardownReport {
    pub suffix: String,
    pub instance: InstanceOutcome,
    pub subnet_id: String,
    pub route_tables_cleared: Vec<String>,
    pub security_lists_deleted: Vec<String>,
    pub gateways_deleted: Vec<String>,
    pub vcn_id: String,
}

/// Removes every resource of the sandbox named by `suffix`.
///
/// Instance termination is best-effort: any failure there is reported and
/// the network teardown still runs.
///
/// # Errors
///
/// Returns an error if the VCN or subnet cannot be found, or any network
/// deletion fails.
pub async fn decommission(
    cloud: &impl CloudProvider,
    compartment_id: &str,
    suffix: &str,
    waits: &WaitSettings,
    reporter: &impl ProgressReporter,
) -> Result<TeardownReport> {
    let names = SandboxNames::new(suffix);
    let policy = waits.resource_policy();

    let instance = match terminate_instance(cloud, compartment_id, &names.instance, policy, reporter)
        .await
    {
        Ok(id) => InstanceOutcome::Terminated { id },
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(instance = %names.instance, %error, "instance teardown failed, continuing");
            reporter.warn(&format!(
                "deleting instance {} failed: {error}.. continuing",
                names.instance
            ));
            InstanceOutcome::Failed { error }
        }
    };

    let vcn = lookup::vcn_by_name(cloud, compartment_id, &names.vcn).await?;
    let subnet = lookup::subnet_by_name(cloud, compartment_id, &vcn.id, &names.subnet).await?;
    reporter.step(&format!("found subnet {} ({})", subnet.id, subnet.display_name));

    reporter.step(&format!("deleting subnet {}...", subnet.id));
    delete_and_wait(
        &subnet.display_name,
        policy,
        || cloud.delete_subnet(&subnet.id),
        || cloud.get_subnet(&subnet.id),
    )
    .await?;
    reporter.success(&format!("subnet {} deleted", subnet.id));

    let route_tables_cleared = clear_route_tables(cloud, compartment_id, &vcn, reporter).await?;
    let security_lists_deleted =
        delete_security_lists(cloud, compartment_id, &vcn, policy, reporter).await?;
    let gateways_deleted = delete_gateways(cloud, compartment_id, &vcn, policy, reporter).await?;

    reporter.step(&format!("deleting VCN {}...", vcn.id));
    delete_and_wait(
        &vcn.display_name,
        policy,
        || cloud.delete_vcn(&vcn.id),
        || cloud.get_vcn(&vcn.id),
    )
    .await?;
    reporter.success(&format!("VCN {} deleted", vcn.id));

    Ok(TeardownReport {
        suffix: suffix.to_string(),
        instance,
        subnet_id: subnet.id,
        route_tables_cleared,
        security_lists_deleted,
        gateways_deleted,
        vcn_id: vcn.id,
    })
}

async fn terminate_instance(
    compute: &impl ComputeApi,
    compartment_id: &str,
    name: &str,
    policy: WaitPolicy,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let instance = lookup::instance_by_name(compute, compartment_id, name).await?;
    reporter.step(&format!("terminating instance {}...", instance.id));
    delete_and_wait(
        name,
        policy,
        || compute.terminate_instance(&instance.id),
        || compute.get_instance(&instance.id),
    )
    .await?;
    reporter.success(&format!("instance {} terminated", instance.id));
    Ok(instance.id)
}

/// Empties every route table of the VCN that still has rules. Tables are
/// provider-owned and go away with the VCN; they cannot be deleted.
///
/// # Errors
///
/// Returns an error if listing or updating fails.
pub async fn clear_route_tables(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn: &Vcn,
    reporter: &impl ProgressReporter,
) -> Result<Vec<String>> {
    let tables = network
        .list_route_tables(compartment_id, &vcn.id)
        .await
        .context("listing route tables")?;
    let mut cleared = Vec::new();
    for rt in tables.into_iter().filter(|rt| !rt.route_rules.is_empty()) {
        reporter.step(&format!("resetting route table {}...", rt.id));
        network
            .update_route_table(&rt.id, &[])
            .await
            .with_context(|| format!("resetting route table {}", rt.id))?;
        reporter.success(&format!("route table {} updated", rt.id));
        cleared.push(rt.id);
    }
    Ok(cleared)
}

/// Deletes every security list of the VCN except the provider default.
///
/// # Errors
///
/// Returns an error if listing or any deletion fails.
pub async fn delete_security_lists(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn: &Vcn,
    policy: WaitPolicy,
    reporter: &impl ProgressReporter,
) -> Result<Vec<String>> {
    let default_name = default_security_list_name(&vcn.display_name);
    let lists = network
        .list_security_lists(compartment_id, &vcn.id)
        .await
        .context("listing security lists")?;
    let mut deleted = Vec::new();
    for sl in lists.into_iter().filter(|sl| sl.display_name != default_name) {
        reporter.step(&format!("deleting security list {}...", sl.id));
        delete_and_wait(
            &sl.display_name,
            policy,
            || network.delete_security_list(&sl.id),
            || network.get_security_list(&sl.id),
        )
        .await?;
        reporter.success(&format!("security list {} deleted", sl.id));
        deleted.push(sl.id);
    }
    Ok(deleted)
}

/// Deletes every internet gateway of the VCN.
///
/// # Errors
///
/// Returns an error if listing or any deletion fails.
pub async fn delete_gateways(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn: &Vcn,
    policy: WaitPolicy,
    reporter: &impl ProgressReporter,
) -> Result<Vec<String>> {
    let gateways = network
        .list_internet_gateways(compartment_id, &vcn.id)
        .await
        .context("listing internet gateways")?;
    let mut deleted = Vec::new();
    for ig in gateways {
        reporter.step(&format!("deleting internet gateway {}...", ig.id));
        delete_and_wait(
            &ig.display_name,
            policy,
            || network.delete_internet_gateway(&ig.id),
            || network.get_internet_gateway(&ig.id),
        )
        .await?;
        reporter.success(&format!("internet gateway {} deleted", ig.id));
        deleted.push(ig.id);
    }
    Ok(deleted)
}
