//! Fixed firewall and routing rules for a sandbox.
//!
//! These structs serialise to the camelCase shape the `oci` tool expects for
//! complex-type arguments such as `--ingress-security-rules`.

use serde::{Deserialize, Serialize};

pub const ANYWHERE: &str = "0.0.0.0/0";
pub const CIDR_BLOCK: &str = "CIDR_BLOCK";
pub const PROTOCOL_ICMP: &str = "1";
pub const PROTOCOL_TCP: &str = "6";
pub const PROTOCOL_ALL: &str = "all";
pub const SSH_PORT: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpOptions {
    pub destination_port_range: PortRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpOptions {
    #[serde(rename = "type")]
    pub icmp_type: u8,
    pub code: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub protocol: String,
    pub source: String,
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_options: Option<TcpOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icmp_options: Option<IcmpOptions>,
}

impl IngressRule {
    fn tcp(port: u16) -> Self {
        Self {
            protocol: PROTOCOL_TCP.to_string(),
            source: ANYWHERE.to_string(),
            source_type: CIDR_BLOCK.to_string(),
            tcp_options: Some(TcpOptions {
                destination_port_range: PortRange {
                    min: port,
                    max: port,
                },
            }),
            icmp_options: None,
        }
    }

    fn icmp(icmp_type: u8, code: u8) -> Self {
        Self {
            protocol: PROTOCOL_ICMP.to_string(),
            source: ANYWHERE.to_string(),
            source_type: CIDR_BLOCK.to_string(),
            tcp_options: None,
            icmp_options: Some(IcmpOptions { icmp_type, code }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EgressRule {
    pub protocol: String,
    pub destination: String,
    pub destination_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    pub destination: String,
    pub destination_type: String,
    pub network_entity_id: String,
}

impl RouteRule {
    /// Default route through the given internet gateway.
    #[must_use]
    pub fn internet(gateway_id: &str) -> Self {
        Self {
            destination: ANYWHERE.to_string(),
            destination_type: CIDR_BLOCK.to_string(),
            network_entity_id: gateway_id.to_string(),
        }
    }
}

/// Ingress: TCP/22, TCP/`open_port`, ICMP type 3 code 4 (path-MTU discovery),
/// all from anywhere.
#[must_use]
pub fn sandbox_ingress_rules(open_port: u16) -> Vec<IngressRule> {
    vec![
        IngressRule::tcp(SSH_PORT),
        IngressRule::tcp(open_port),
        IngressRule::icmp(3, 4),
    ]
}

/// Egress: everything, everywhere.
#[must_use]
pub fn sandbox_egress_rules() -> Vec<EgressRule> {
    vec![EgressRule {
        protocol: PROTOCOL_ALL.to_string(),
        destination: ANYWHERE.to_string(),
        destination_type: CIDR_BLOCK.to_string(),
    }]
}
