// ABOUTME: Instance specification and the configuration document derived from it.
// ABOUTME: Resource values stay strings so unit suffixes reach LXD untouched.

use std::collections::BTreeMap;

use crate::lxd::{DeviceConfig, InstanceConfig};
use crate::types::{
    Fingerprint, FingerprintError, InstanceKind, InstanceName, InstanceNameError,
};

use super::result::Failure;

/// Everything needed to provision one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub name: InstanceName,
    pub fingerprint: Fingerprint,
    /// Memory limit, e.g. "2GB".
    pub memory: String,
    /// Root disk size, e.g. "20GB". Applied after creation.
    pub disk: String,
    /// CPU limit, e.g. "2".
    pub cpu: String,
    /// Static IPv4 address for the primary NIC.
    pub address: String,
    pub kind: InstanceKind,
}

#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("invalid instance name: {0}")]
    Name(#[from] InstanceNameError),

    #[error("invalid image fingerprint: {0}")]
    Fingerprint(#[from] FingerprintError),
}

impl From<SpecError> for Failure {
    fn from(err: SpecError) -> Self {
        Failure::new(err.to_string(), 400)
    }
}

impl InstanceSpec {
    pub fn new(
        name: &str,
        fingerprint: &str,
        memory: impl Into<String>,
        disk: impl Into<String>,
        cpu: impl Into<String>,
        address: impl Into<String>,
        kind: InstanceKind,
    ) -> Result<Self, SpecError> {
        Ok(Self {
            name: InstanceName::new(name)?,
            fingerprint: Fingerprint::new(fingerprint)?,
            memory: memory.into(),
            disk: disk.into(),
            cpu: cpu.into(),
            address: address.into(),
            kind,
        })
    }

    /// Build the create-time configuration document.
    ///
    /// The root device carries no size here; the disk is resized after the
    /// instance exists. Secure boot is disabled for virtual machines only.
    pub fn instance_config(&self, storage_pool: &str) -> InstanceConfig {
        let mut config = BTreeMap::from([
            ("limits.memory".to_string(), self.memory.clone()),
            ("limits.cpu".to_string(), self.cpu.clone()),
        ]);
        if self.kind.is_virtual_machine() {
            config.insert("security.secureboot".to_string(), "false".to_string());
        }

        let root: DeviceConfig = BTreeMap::from([
            ("path".to_string(), "/".to_string()),
            ("pool".to_string(), storage_pool.to_string()),
            ("type".to_string(), "disk".to_string()),
        ]);

        InstanceConfig {
            profiles: Vec::new(),
            config,
            devices: BTreeMap::from([(super::steps::ROOT_DEVICE.to_string(), root)]),
            kind: self.kind,
        }
    }
}
