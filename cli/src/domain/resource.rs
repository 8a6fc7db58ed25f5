//! Cloud resource records as returned by the provider.
//!
//! Field names follow the `oci` tool's JSON output (kebab-case). Only the
//! fields the jobs read are modelled; everything else is ignored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Lifecycle state ───────────────────────────────────────────────────────────

/// Provider lifecycle state shared by every resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Provisioning,
    Available,
    Active,
    Inactive,
    Starting,
    Running,
    Stopping,
    Stopped,
    Updating,
    Moving,
    CreatingImage,
    Terminating,
    Terminated,
    Deleting,
    Deleted,
    Failed,
    Unknown(String),
}

impl LifecycleState {
    /// The wire spelling, e.g. `"TERMINATED"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Available => "AVAILABLE",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Updating => "UPDATING",
            Self::Moving => "MOVING",
            Self::CreatingImage => "CREATING_IMAGE",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Deleting => "DELETING",
            Self::Deleted => "DELETED",
            Self::Failed => "FAILED",
            Self::Unknown(s) => s,
        }
    }

    /// Terminal states: the resource is gone and a `404` means the same thing.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Deleted)
    }

    fn parse(s: &str) -> Self {
        match s {
            "PROVISIONING" => Self::Provisioning,
            "AVAILABLE" => Self::Available,
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "STARTING" => Self::Starting,
            "RUNNING" => Self::Running,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "UPDATING" => Self::Updating,
            "MOVING" => Self::Moving,
            "CREATING_IMAGE" => Self::CreatingImage,
            "TERMINATING" => Self::Terminating,
            "TERMINATED" => Self::Terminated,
            "DELETING" => Self::Deleting,
            "DELETED" => Self::Deleted,
            "FAILED" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LifecycleState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LifecycleState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Anything with a display name and lifecycle state can be looked up by name
/// and waited on.
pub trait Lifecycle {
    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn lifecycle_state(&self) -> &LifecycleState;
}

macro_rules! impl_lifecycle {
    ($($ty:ty),* $(,)?) => {
        $(impl Lifecycle for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn display_name(&self) -> &str {
                &self.display_name
            }
            fn lifecycle_state(&self) -> &LifecycleState {
                &self.lifecycle_state
            }
        })*
    };
}

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Compartment {
    pub id: String,
    pub name: String,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AvailabilityDomain {
    pub name: String,
}

// ── Compute ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Image {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Instance {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
    pub time_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VnicAttachment {
    pub id: String,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub vnic_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vnic {
    pub id: String,
    #[serde(default)]
    pub public_ip: Option<String>,
}

// ── Networking ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vcn {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InternetGateway {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteTable {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
    /// Kept opaque: teardown only needs to know whether the list is empty.
    #[serde(default)]
    pub route_rules: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityList {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Subnet {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
}

impl_lifecycle!(Instance, Vcn, InternetGateway, RouteTable, SecurityList, Subnet);
