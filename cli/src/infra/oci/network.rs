use anyhow::Result;

use super::{OciCli, json_arg};
use crate::application::ports::{
    CommandRunner, GatewaySpec, NetworkApi, SecurityListSpec, SubnetSpec, VcnSpec,
};
use crate::domain::{InternetGateway, RouteRule, RouteTable, SecurityList, Subnet, Vcn, Vnic};

impl<R: CommandRunner> NetworkApi for OciCli<R> {
    // ── VCN ──────────────────────────────────────────────────────────────────

    async fn create_vcn(&self, spec: &VcnSpec<'_>) -> Result<Vcn> {
        self.data(&[
            "network",
            "vcn",
            "create",
            "--compartment-id",
            spec.compartment_id,
            "--display-name",
            spec.display_name,
            "--cidr-block",
            spec.cidr_block,
            "--dns-label",
            spec.dns_label,
        ])
        .await
    }

    async fn get_vcn(&self, vcn_id: &str) -> Result<Vcn> {
        self.data(&["network", "vcn", "get", "--vcn-id", vcn_id]).await
    }

    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>> {
        self.list(&["network", "vcn", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }

    async fn delete_vcn(&self, vcn_id: &str) -> Result<()> {
        self.unit(&["network", "vcn", "delete", "--vcn-id", vcn_id, "--force"])
            .await
    }

    // ── Internet gateway ─────────────────────────────────────────────────────

    async fn create_internet_gateway(&self, spec: &GatewaySpec<'_>) -> Result<InternetGateway> {
        self.data(&[
            "network",
            "internet-gateway",
            "create",
            "--compartment-id",
            spec.compartment_id,
            "--vcn-id",
            spec.vcn_id,
            "--display-name",
            spec.display_name,
            "--is-enabled",
            "true",
        ])
        .await
    }

    async fn get_internet_gateway(&self, gateway_id: &str) -> Result<InternetGateway> {
        self.data(&["network", "internet-gateway", "get", "--ig-id", gateway_id])
            .await
    }

    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<InternetGateway>> {
        self.list(&[
            "network",
            "internet-gateway",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--all",
        ])
        .await
    }

    async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        self.unit(&[
            "network",
            "internet-gateway",
            "delete",
            "--ig-id",
            gateway_id,
            "--force",
        ])
        .await
    }

    // ── Route table ──────────────────────────────────────────────────────────

    async fn list_route_tables(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<RouteTable>> {
        self.list(&[
            "network",
            "route-table",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--all",
        ])
        .await
    }

    async fn update_route_table(
        &self,
        route_table_id: &str,
        rules: &[RouteRule],
    ) -> Result<RouteTable> {
        let rules = json_arg(rules)?;
        self.data(&[
            "network",
            "route-table",
            "update",
            "--rt-id",
            route_table_id,
            "--route-rules",
            &rules,
            "--force",
        ])
        .await
    }

    // ── Security list ────────────────────────────────────────────────────────

    async fn create_security_list(&self, spec: &SecurityListSpec<'_>) -> Result<SecurityList> {
        let ingress = json_arg(spec.ingress)?;
        let egress = json_arg(spec.egress)?;
        self.data(&[
            "network",
            "security-list",
            "create",
            "--compartment-id",
            spec.compartment_id,
            "--vcn-id",
            spec.vcn_id,
            "--display-name",
            spec.display_name,
            "--ingress-security-rules",
            &ingress,
            "--egress-security-rules",
            &egress,
        ])
        .await
    }

    async fn get_security_list(&self, security_list_id: &str) -> Result<SecurityList> {
        self.data(&[
            "network",
            "security-list",
            "get",
            "--security-list-id",
            security_list_id,
        ])
        .await
    }

    async fn list_security_lists(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<SecurityList>> {
        self.list(&[
            "network",
            "security-list",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--all",
        ])
        .await
    }

    async fn delete_security_list(&self, security_list_id: &str) -> Result<()> {
        self.unit(&[
            "network",
            "security-list",
            "delete",
            "--security-list-id",
            security_list_id,
            "--force",
        ])
        .await
    }

    // ── Subnet ───────────────────────────────────────────────────────────────

    async fn create_subnet(&self, spec: &SubnetSpec<'_>) -> Result<Subnet> {
        let security_list_ids = json_arg(spec.security_list_ids)?;
        self.data(&[
            "network",
            "subnet",
            "create",
            "--compartment-id",
            spec.compartment_id,
            "--vcn-id",
            spec.vcn_id,
            "--display-name",
            spec.display_name,
            "--cidr-block",
            spec.cidr_block,
            "--dns-label",
            spec.dns_label,
            "--security-list-ids",
            &security_list_ids,
            "--availability-domain",
            spec.availability_domain,
        ])
        .await
    }

    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        self.data(&["network", "subnet", "get", "--subnet-id", subnet_id])
            .await
    }

    async fn list_subnets(&self, compartment_id: &str, vcn_id: &str) -> Result<Vec<Subnet>> {
        self.list(&[
            "network",
            "subnet",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--all",
        ])
        .await
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.unit(&["network", "subnet", "delete", "--subnet-id", subnet_id, "--force"])
            .await
    }

    // ── VNIC ─────────────────────────────────────────────────────────────────

    async fn get_vnic(&self, vnic_id: &str) -> Result<Vnic> {
        self.data(&["network", "vnic", "get", "--vnic-id", vnic_id])
            .await
    }
}
