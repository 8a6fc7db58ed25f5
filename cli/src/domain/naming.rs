//! Display-name conventions tying one sandbox's resources together.
//!
//! Pure functions only.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::error::InputError;

pub const VCN_PREFIX: &str = "vcn-";
pub const GATEWAY_PREFIX: &str = "ig-";
pub const SECURITY_LIST_PREFIX: &str = "sl-";
pub const SUBNET_PREFIX: &str = "subnet-";
pub const INSTANCE_PREFIX: &str = "proxy-";

/// OCI caps DNS labels at 15 characters.
const DNS_LABEL_MAX: usize = 15;

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,31}$").expect("valid regex")
});

/// Validates a sandbox name suffix.
///
/// # Errors
///
/// Returns [`InputError::InvalidSuffix`] if the suffix contains characters the
/// provider rejects in display names or DNS labels.
pub fn validate_suffix(suffix: &str) -> Result<()> {
    if !SUFFIX_RE.is_match(suffix) {
        return Err(InputError::InvalidSuffix(suffix.to_string()).into());
    }
    Ok(())
}

/// The full set of display names for one sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxNames {
    pub suffix: String,
    pub vcn: String,
    pub gateway: String,
    pub security_list: String,
    pub subnet: String,
    pub instance: String,
}

impl SandboxNames {
    #[must_use]
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            vcn: format!("{VCN_PREFIX}{suffix}"),
            gateway: format!("{GATEWAY_PREFIX}{suffix}"),
            security_list: format!("{SECURITY_LIST_PREFIX}{suffix}"),
            subnet: format!("{SUBNET_PREFIX}{suffix}"),
            instance: format!("{INSTANCE_PREFIX}{suffix}"),
        }
    }
}

/// Recovers the suffix from an instance display name, or `None` when the
/// name does not follow the `proxy-<suffix>` convention.
#[must_use]
pub fn suffix_from_instance_name(name: &str) -> Option<&str> {
    name.strip_prefix(INSTANCE_PREFIX)
        .filter(|suffix| !suffix.is_empty())
}

/// Name the provider gives the route table it creates with every VCN.
#[must_use]
pub fn default_route_table_name(vcn_display_name: &str) -> String {
    format!("Default Route Table for {vcn_display_name}")
}

/// Name the provider gives the security list it creates with every VCN.
#[must_use]
pub fn default_security_list_name(vcn_display_name: &str) -> String {
    format!("Default Security List for {vcn_display_name}")
}

/// Derives a DNS label from a display name: lowercase, no `-` or spaces,
/// at most 15 characters.
#[must_use]
pub fn dns_label(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .take(DNS_LABEL_MAX)
        .collect()
}
