//! Find resources by display name.
//!
//! Listings are small, so every lookup is a linear scan. The first live
//! match wins; duplicates are logged rather than rejected.

use anyhow::{Context, Result};

use crate::application::ports::{ComputeApi, IdentityApi, ImageQuery, NetworkApi};
use crate::domain::naming::default_route_table_name;
use crate::domain::{
    AvailabilityDomain, CloudError, Instance, Lifecycle, LifecycleState, RouteTable, Subnet, Vcn,
};

/// First entry named `name` that is not `TERMINATED`.
///
/// # Errors
///
/// Returns [`CloudError::NotFound`] when nothing matches.
pub fn first_live<T: Lifecycle>(items: Vec<T>, kind: &'static str, name: &str) -> Result<T> {
    let mut matches = items.into_iter().filter(|item| {
        item.display_name() == name && *item.lifecycle_state() != LifecycleState::Terminated
    });
    let first = matches.next().ok_or_else(|| CloudError::NotFound {
        kind,
        name: name.to_string(),
    })?;
    let extra: Vec<String> = matches.map(|m| m.id().to_string()).collect();
    if !extra.is_empty() {
        tracing::warn!(
            kind,
            name,
            chosen = first.id(),
            ignored = ?extra,
            "duplicate display names, using the first match"
        );
    }
    Ok(first)
}

/// Resolves a compartment OCID from its name. Only `ACTIVE` compartments
/// count.
///
/// # Errors
///
/// Returns [`CloudError::NotFound`] when no active compartment has that name.
pub async fn compartment_id(
    identity: &impl IdentityApi,
    tenancy_id: &str,
    name: &str,
) -> Result<String> {
    let compartments = identity
        .list_compartments(tenancy_id)
        .await
        .context("listing compartments")?;
    compartments
        .into_iter()
        .find(|c| c.name == name && c.lifecycle_state == LifecycleState::Active)
        .map(|c| c.id)
        .ok_or_else(|| {
            CloudError::NotFound {
                kind: "Compartment",
                name: name.to_string(),
            }
            .into()
        })
}

/// # Errors
///
/// Returns [`CloudError::NotFound`] when the compartment has no such domain.
pub async fn availability_domain(
    identity: &impl IdentityApi,
    compartment_id: &str,
    name: &str,
) -> Result<AvailabilityDomain> {
    let domains = identity
        .list_availability_domains(compartment_id)
        .await
        .context("listing availability domains")?;
    domains.into_iter().find(|ad| ad.name == name).ok_or_else(|| {
        CloudError::NotFound {
            kind: "Availability domain",
            name: name.to_string(),
        }
        .into()
    })
}

/// The first image the provider lists for the OS/version/shape combination.
///
/// # Errors
///
/// Returns [`CloudError::NotFound`] when the listing is empty.
pub async fn image_id(compute: &impl ComputeApi, query: &ImageQuery<'_>) -> Result<String> {
    let images = compute.list_images(query).await.context("listing images")?;
    images.into_iter().next().map(|i| i.id).ok_or_else(|| {
        CloudError::NotFound {
            kind: "Image",
            name: format!(
                "{} {} for {}",
                query.os_name, query.os_version, query.shape
            ),
        }
        .into()
    })
}

/// # Errors
///
/// Returns [`CloudError::NotFound`] when no live instance has that name.
pub async fn instance_by_name(
    compute: &impl ComputeApi,
    compartment_id: &str,
    name: &str,
) -> Result<Instance> {
    let instances = compute
        .list_instances(compartment_id)
        .await
        .context("listing instances")?;
    first_live(instances, "Instance", name)
}

/// # Errors
///
/// Returns [`CloudError::NotFound`] when no live VCN has that name.
pub async fn vcn_by_name(network: &impl NetworkApi, compartment_id: &str, name: &str) -> Result<Vcn> {
    let vcns = network
        .list_vcns(compartment_id)
        .await
        .context("listing VCNs")?;
    first_live(vcns, "VCN", name)
}

/// # Errors
///
/// Returns [`CloudError::NotFound`] when the VCN has no live subnet with that
/// name.
pub async fn subnet_by_name(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn_id: &str,
    name: &str,
) -> Result<Subnet> {
    let subnets = network
        .list_subnets(compartment_id, vcn_id)
        .await
        .context("listing subnets")?;
    first_live(subnets, "Subnet", name)
}

/// The route table the provider created along with `vcn`.
///
/// # Errors
///
/// Returns [`CloudError::NotFound`] if the VCN has no default route table.
pub async fn default_route_table(
    network: &impl NetworkApi,
    compartment_id: &str,
    vcn: &Vcn,
) -> Result<RouteTable> {
    let tables = network
        .list_route_tables(compartment_id, &vcn.id)
        .await
        .context("listing route tables")?;
    for rt in &tables {
        tracing::debug!(id = %rt.id, name = %rt.display_name, "route table");
    }
    first_live(tables, "Route table", &default_route_table_name(&vcn.display_name))
}
