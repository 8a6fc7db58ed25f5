use anyhow::Result;

use super::OciCli;
use crate::application::ports::{CommandRunner, IdentityApi};
use crate::domain::{AvailabilityDomain, Compartment};

impl<R: CommandRunner> IdentityApi for OciCli<R> {
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>> {
        self.list(&[
            "iam",
            "compartment",
            "list",
            "--compartment-id",
            tenancy_id,
            "--compartment-id-in-subtree",
            "true",
            "--all",
        ])
        .await
    }

    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>> {
        self.list(&[
            "iam",
            "availability-domain",
            "list",
            "--compartment-id",
            compartment_id,
        ])
        .await
    }
}
