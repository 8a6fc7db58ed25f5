//! Domain layer: types and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod age;
pub mod config;
pub mod error;
pub mod naming;
pub mod resource;
pub mod security;

pub use age::{LongRunningInstance, long_running, reapable_suffixes};
pub use config::{ProxyboxConfig, WaitPolicy, oci_profile_value, validate_config};
pub use error::{CloudError, ConfigError, InputError, is_gone};
pub use naming::{SandboxNames, suffix_from_instance_name, validate_suffix};
pub use resource::{
    AvailabilityDomain, Compartment, Image, Instance, InternetGateway, Lifecycle, LifecycleState,
    RouteTable, SecurityList, Subnet, Vcn, Vnic, VnicAttachment,
};
pub use security::{EgressRule, IngressRule, RouteRule};
