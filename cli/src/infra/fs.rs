//! Filesystem infrastructure: local inputs to `start` and its IP file.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the cloud-init script as raw bytes; it is base64-encoded verbatim.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_cloud_init(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading cloud-init {}", path.display()))
}

/// Reads an SSH public key file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no key.
pub fn read_ssh_public_key(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path)
        .with_context(|| format!("reading SSH public key {}", path.display()))?;
    if key.trim().is_empty() {
        anyhow::bail!("SSH public key {} is empty", path.display());
    }
    Ok(key)
}

/// Writes the public IP, with no trailing newline, replacing any previous
/// content.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_ip_address(path: &Path, ip: &str) -> Result<()> {
    std::fs::write(path, ip).with_context(|| format!("writing IP address to {}", path.display()))
}
