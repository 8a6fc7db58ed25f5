use anyhow::Result;

use super::{OciCli, json_arg};
use crate::application::ports::{CommandRunner, ComputeApi, ImageQuery, LaunchSpec};
use crate::domain::{Image, Instance, VnicAttachment};

impl<R: CommandRunner> ComputeApi for OciCli<R> {
    async fn list_images(&self, query: &ImageQuery<'_>) -> Result<Vec<Image>> {
        self.list(&[
            "compute",
            "image",
            "list",
            "--compartment-id",
            query.compartment_id,
            "--operating-system",
            query.os_name,
            "--operating-system-version",
            query.os_version,
            "--shape",
            query.shape,
            "--all",
        ])
        .await
    }

    async fn launch_instance(&self, spec: &LaunchSpec<'_>) -> Result<Instance> {
        let metadata = json_arg(spec.metadata)?;
        let shape_config = json_arg(&spec.shape_config)?;
        let mut args = vec![
            "compute",
            "instance",
            "launch",
            "--compartment-id",
            spec.compartment_id,
            "--availability-domain",
            spec.availability_domain,
            "--shape",
            spec.shape,
            "--display-name",
            spec.display_name,
            "--image-id",
            spec.image_id,
            "--subnet-id",
            spec.subnet_id,
            "--assign-public-ip",
            "true",
            "--metadata",
            &metadata,
        ];
        if !spec.shape_config.is_empty() {
            args.push("--shape-config");
            args.push(&shape_config);
        }
        self.data(&args).await
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance> {
        self.data(&["compute", "instance", "get", "--instance-id", instance_id])
            .await
    }

    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>> {
        self.list(&[
            "compute",
            "instance",
            "list",
            "--compartment-id",
            compartment_id,
            "--all",
        ])
        .await
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        self.unit(&[
            "compute",
            "instance",
            "terminate",
            "--instance-id",
            instance_id,
            "--force",
        ])
        .await
    }

    async fn list_vnic_attachments(
        &self,
        compartment_id: &str,
        instance_id: &str,
    ) -> Result<Vec<VnicAttachment>> {
        self.list(&[
            "compute",
            "vnic-attachment",
            "list",
            "--compartment-id",
            compartment_id,
            "--instance-id",
            instance_id,
            "--all",
        ])
        .await
    }
}
