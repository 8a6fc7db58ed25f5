//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::domain::{
    AvailabilityDomain, Compartment, EgressRule, Image, IngressRule, Instance, InternetGateway,
    ProxyboxConfig, RouteRule, RouteTable, SecurityList, Subnet, Vcn, Vnic, VnicAttachment,
};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Create parameters for a VCN.
pub struct VcnSpec<'a> {
    pub compartment_id: &'a str,
    pub display_name: &'a str,
    pub cidr_block: &'a str,
    pub dns_label: &'a str,
}

/// Create parameters for an internet gateway. Gateways are always created
/// enabled.
pub struct GatewaySpec<'a> {
    pub compartment_id: &'a str,
    pub vcn_id: &'a str,
    pub display_name: &'a str,
}

/// Create parameters for a security list.
pub struct SecurityListSpec<'a> {
    pub compartment_id: &'a str,
    pub vcn_id: &'a str,
    pub display_name: &'a str,
    pub ingress: &'a [IngressRule],
    pub egress: &'a [EgressRule],
}

/// Create parameters for an AD-specific subnet.
pub struct SubnetSpec<'a> {
    pub compartment_id: &'a str,
    pub vcn_id: &'a str,
    pub display_name: &'a str,
    pub cidr_block: &'a str,
    pub dns_label: &'a str,
    pub security_list_ids: &'a [String],
    pub availability_domain: &'a str,
}

/// Image search filter.
pub struct ImageQuery<'a> {
    pub compartment_id: &'a str,
    pub os_name: &'a str,
    pub os_version: &'a str,
    pub shape: &'a str,
}

/// Flexible-shape sizing. Unset fields are left to the provider's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    #[serde(rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
}

impl ShapeConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ocpus.is_none() && self.memory_in_gbs.is_none()
    }
}

/// Launch parameters for a compute instance with one public VNIC.
pub struct LaunchSpec<'a> {
    pub compartment_id: &'a str,
    pub availability_domain: &'a str,
    pub shape: &'a str,
    pub shape_config: ShapeConfig,
    pub display_name: &'a str,
    pub image_id: &'a str,
    pub subnet_id: &'a str,
    /// Instance metadata, e.g. `user_data` and `ssh_authorized_keys`.
    pub metadata: &'a BTreeMap<String, String>,
}

// ── Cloud Port Traits ─────────────────────────────────────────────────────────

/// Identity service: compartments and availability domains.
#[allow(async_fn_in_trait)]
pub trait IdentityApi {
    /// All compartments under the tenancy, subtree included.
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>>;
    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>>;
}

/// Compute service: images, instances, VNIC attachments.
#[allow(async_fn_in_trait)]
pub trait ComputeApi {
    async fn list_images(&self, query: &ImageQuery<'_>) -> Result<Vec<Image>>;
    async fn launch_instance(&self, spec: &LaunchSpec<'_>) -> Result<Instance>;
    async fn get_instance(&self, instance_id: &str) -> Result<Instance>;
    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>>;
    async fn terminate_instance(&self, instance_id: &str) -> Result<()>;
    async fn list_vnic_attachments(
        &self,
        compartment_id: &str,
        instance_id: &str,
    ) -> Result<Vec<VnicAttachment>>;
}

/// Virtual network service.
#[allow(async_fn_in_trait)]
pub trait NetworkApi {
    async fn create_vcn(&self, spec: &VcnSpec<'_>) -> Result<Vcn>;
    async fn get_vcn(&self, vcn_id: &str) -> Result<Vcn>;
    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>>;
    async fn delete_vcn(&self, vcn_id: &str) -> Result<()>;

    async fn create_internet_gateway(&self, spec: &GatewaySpec<'_>) -> Result<InternetGateway>;
    async fn get_internet_gateway(&self, gateway_id: &str) -> Result<InternetGateway>;
    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<InternetGateway>>;
    async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()>;

    async fn list_route_tables(&self, compartment_id: &str, vcn_id: &str)
    -> Result<Vec<RouteTable>>;
    /// Replaces the table's rules wholesale.
    async fn update_route_table(&self, route_table_id: &str, rules: &[RouteRule])
    -> Result<RouteTable>;

    async fn create_security_list(&self, spec: &SecurityListSpec<'_>) -> Result<SecurityList>;
    async fn get_security_list(&self, security_list_id: &str) -> Result<SecurityList>;
    async fn list_security_lists(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<SecurityList>>;
    async fn delete_security_list(&self, security_list_id: &str) -> Result<()>;

    async fn create_subnet(&self, spec: &SubnetSpec<'_>) -> Result<Subnet>;
    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet>;
    async fn list_subnets(&self, compartment_id: &str, vcn_id: &str) -> Result<Vec<Subnet>>;
    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    async fn get_vnic(&self, vnic_id: &str) -> Result<Vnic>;
}

/// Everything the jobs need from the provider.
pub trait CloudProvider: IdentityApi + ComputeApi + NetworkApi {}

/// Blanket implementation: any type implementing all three services is a `CloudProvider`.
impl<T> CloudProvider for T where T: IdentityApi + ComputeApi + NetworkApi {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output using the runner's default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts where proxybox settings come from.
pub trait ConfigStore {
    /// Load settings, falling back to defaults when nothing is stored.
    fn load(&self) -> Result<ProxyboxConfig>;
    /// Location of the settings file.
    fn path(&self) -> Result<PathBuf>;
}
