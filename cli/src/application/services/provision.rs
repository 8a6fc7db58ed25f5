//! Create one sandbox: network, gateway, route, firewall, subnet, instance.
//!
//! Strictly linear. Each step waits for its resource before the next one
//! starts, and nothing is rolled back on failure: a half-built sandbox is
//! removed with `proxybox stop`.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::application::ports::{
    CloudProvider, GatewaySpec, ImageQuery, LaunchSpec, NetworkApi, ProgressReporter,
    SecurityListSpec, ShapeConfig, SubnetSpec, VcnSpec,
};
use crate::application::services::lookup;
use crate::application::services::wait::{WaitOutcome, await_state};
use crate::domain::config::{NetworkSettings, WaitSettings};
use crate::domain::naming::dns_label;
use crate::domain::security::{sandbox_egress_rules, sandbox_ingress_rules};
use crate::domain::{CloudError, Lifecycle, LifecycleState, RouteRule, SandboxNames, WaitPolicy};

/// Everything needed to build one sandbox.
pub struct ProvisionRequest<'a> {
    pub compartment_id: &'a str,
    pub availability_domain: &'a str,
    pub names: &'a SandboxNames,
    pub open_port: u16,
    pub shape: &'a str,
    pub shape_config: ShapeConfig,
    pub os_name: &'a str,
    pub os_version: &'a str,
    /// Raw cloud-init script; base64-encoded into `user_data`.
    pub cloud_init: &'a [u8],
    /// Public key material for `ssh_authorized_keys`.
    pub ssh_public_key: Option<&'a str>,
}

/// OCIDs of everything that was created, plus the instance's public IP.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedSandbox {
    pub vcn_id: String,
    pub gateway_id: String,
    pub route_table_id: String,
    pub security_list_id: String,
    pub subnet_id: String,
    pub instance_id: String,
    pub public_ip: String,
}

/// Instance metadata: base64 `user_data`, plus `ssh_authorized_keys` when a
/// key is given.
#[must_use]
pub fn instance_metadata(cloud_init: &[u8], ssh_public_key: Option<&str>) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("user_data".to_string(), STANDARD.encode(cloud_init));
    if let Some(key) = ssh_public_key {
        metadata.insert("ssh_authorized_keys".to_string(), key.trim().to_string());
    }
    metadata
}

/// Builds the sandbox described by `req`.
///
/// # Errors
///
/// Returns the first failing step's error. Resources created before the
/// failure are left in place.
pub async fn provision(
    cloud: &impl CloudProvider,
    req: &ProvisionRequest<'_>,
    network_cfg: &NetworkSettings,
    waits: &WaitSettings,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionedSandbox> {
    let resource_wait = waits.resource_policy();

    let ad = lookup::availability_domain(cloud, req.compartment_id, req.availability_domain).await?;
    reporter.step(&format!("using availability domain {}", ad.name));

    let image_id = lookup::image_id(
        cloud,
        &ImageQuery {
            compartment_id: req.compartment_id,
            os_name: req.os_name,
            os_version: req.os_version,
            shape: req.shape,
        },
    )
    .await?;
    reporter.step(&format!("using image {image_id}"));

    // Network
    reporter.step(&format!("creating VCN {}...", req.names.vcn));
    let vcn = cloud
        .create_vcn(&VcnSpec {
            compartment_id: req.compartment_id,
            display_name: &req.names.vcn,
            cidr_block: &network_cfg.vcn_cidr,
            dns_label: &dns_label(&req.names.vcn),
        })
        .await
        .context("creating VCN")?;
    let vcn = wait_available(&req.names.vcn, resource_wait, || cloud.get_vcn(&vcn.id)).await?;
    reporter.success(&format!("VCN created: {}", vcn.id));

    reporter.step(&format!("creating internet gateway {}...", req.names.gateway));
    let gateway = cloud
        .create_internet_gateway(&GatewaySpec {
            compartment_id: req.compartment_id,
            vcn_id: &vcn.id,
            display_name: &req.names.gateway,
        })
        .await
        .context("creating internet gateway")?;
    let gateway = wait_available(&req.names.gateway, resource_wait, || {
        cloud.get_internet_gateway(&gateway.id)
    })
    .await?;
    reporter.success(&format!("internet gateway created: {}", gateway.id));

    reporter.step("routing default route table through the gateway...");
    let route_table = route_through_gateway(cloud, req.compartment_id, &vcn, &gateway.id).await?;
    reporter.success("default route table updated");

    // Firewall
    reporter.step(&format!(
        "creating security list {} with port {} open...",
        req.names.security_list, req.open_port
    ));
    let ingress = sandbox_ingress_rules(req.open_port);
    let egress = sandbox_egress_rules();
    let security_list = cloud
        .create_security_list(&SecurityListSpec {
            compartment_id: req.compartment_id,
            vcn_id: &vcn.id,
            display_name: &req.names.security_list,
            ingress: &ingress,
            egress: &egress,
        })
        .await
        .context("creating security list")?;
    let security_list = wait_available(&req.names.security_list, resource_wait, || {
        cloud.get_security_list(&security_list.id)
    })
    .await?;
    reporter.success(&format!("security list created: {}", security_list.id));

    // Subnet
    reporter.step(&format!(
        "creating subnet {} with CIDR {}...",
        req.names.subnet, network_cfg.subnet_cidr
    ));
    let security_list_ids = [security_list.id.clone()];
    let subnet = cloud
        .create_subnet(&SubnetSpec {
            compartment_id: req.compartment_id,
            vcn_id: &vcn.id,
            display_name: &req.names.subnet,
            cidr_block: &network_cfg.subnet_cidr,
            dns_label: &dns_label(&req.names.subnet),
            security_list_ids: &security_list_ids,
            availability_domain: &ad.name,
        })
        .await
        .context("creating subnet")?;
    let subnet = wait_available(&req.names.subnet, resource_wait, || cloud.get_subnet(&subnet.id))
        .await?;
    reporter.success(&format!("subnet created: {}", subnet.id));

    // Instance
    reporter.step(&format!("launching instance {}...", req.names.instance));
    let metadata = instance_metadata(req.cloud_init, req.ssh_public_key);
    let launched = cloud
        .launch_instance(&LaunchSpec {
            compartment_id: req.compartment_id,
            availability_domain: &ad.name,
            shape: req.shape,
            shape_config: req.shape_config,
            display_name: &req.names.instance,
            image_id: &image_id,
            subnet_id: &subnet.id,
            metadata: &metadata,
        })
        .await
        .context("launching instance")?;
    tracing::info!(
        id = %launched.id,
        name = %launched.display_name,
        state = %launched.lifecycle_state,
        "instance being created"
    );
    reporter.step("waiting for instance to be provisioned...");
    let instance = match await_state(
        &req.names.instance,
        &LifecycleState::Running,
        waits.instance_policy(),
        || cloud.get_instance(&launched.id),
    )
    .await?
    {
        WaitOutcome::Reached(instance) => instance,
        WaitOutcome::Gone => anyhow::bail!("instance {} disappeared during launch", launched.id),
    };
    reporter.success(&format!("instance is now {}", instance.lifecycle_state));

    let public_ip = public_ip(cloud, req.compartment_id, &instance.id).await?;

    Ok(ProvisionedSandbox {
        vcn_id: vcn.id,
        gateway_id: gateway.id,
        route_table_id: route_table.id,
        security_list_id: security_list.id,
        subnet_id: subnet.id,
        instance_id: instance.id,
        public_ip,
    })
}

/// Points the VCN's default route table at the gateway for `0.0.0.0/0`.
///
/// # Errors
///
/// Returns an error if the default table is missing or the update fails.
pub async fn route_through_gateway(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn: &crate::domain::Vcn,
    gateway_id: &str,
) -> Result<crate::domain::RouteTable> {
    let table = lookup::default_route_table(network, compartment_id, vcn).await?;
    network
        .update_route_table(&table.id, &[RouteRule::internet(gateway_id)])
        .await
        .context("updating default route table")
}

/// Public IP of the instance's first VNIC.
///
/// # Errors
///
/// Returns an error if the instance has no VNIC or the VNIC has no public IP.
pub async fn public_ip(
    cloud: &impl CloudProvider,
    compartment_id: &str,
    instance_id: &str,
) -> Result<String> {
    let attachments = cloud
        .list_vnic_attachments(compartment_id, instance_id)
        .await
        .context("listing VNIC attachments")?;
    let vnic_id = attachments
        .into_iter()
        .find_map(|a| a.vnic_id)
        .ok_or_else(|| CloudError::NotFound {
            kind: "VNIC attachment",
            name: instance_id.to_string(),
        })?;
    let vnic = cloud.get_vnic(&vnic_id).await.context("reading VNIC")?;
    vnic.public_ip.ok_or_else(|| {
        CloudError::NotFound {
            kind: "Public IP",
            name: vnic_id,
        }
        .into()
    })
}

async fn wait_available<T, F, Fut>(resource: &str, policy: WaitPolicy, fetch: F) -> Result<T>
where
    T: Lifecycle,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    match await_state(resource, &LifecycleState::Available, policy, fetch).await? {
        WaitOutcome::Reached(found) => Ok(found),
        WaitOutcome::Gone => anyhow::bail!("{resource} disappeared while being created"),
    }
}
