//! Infrastructure implementation of the `ConfigStore` port, plus the one
//! value proxybox reads from the OCI config file itself.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::config::{ProxyboxConfig, oci_profile_value, validate_config};

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProxyboxConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(ProxyboxConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: ProxyboxConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        validate_config(&config).with_context(|| format!("invalid {}", path.display()))?;
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("PROXYBOX_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".proxybox").join("config.yaml"))
    }
}

/// Expands a leading `~/` the way the `oci` tool does.
///
/// # Errors
///
/// Returns an error if the path starts with `~/` and there is no home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .ok_or_else(|| anyhow::anyhow!("cannot determine home directory")),
        None => Ok(PathBuf::from(path)),
    }
}

/// Reads the tenancy OCID of `profile` from an OCI config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or the profile or its
/// `tenancy` key is missing.
pub fn read_tenancy(config_file: &Path, profile: &str) -> Result<String> {
    let contents = std::fs::read_to_string(config_file)
        .with_context(|| format!("cannot read OCI config {}", config_file.display()))?;
    oci_profile_value(
        &contents,
        &config_file.display().to_string(),
        profile,
        "tenancy",
    )
}
