// ABOUTME: Device operations trait for the LXD control plane.
// ABOUTME: Add devices to instances and update single device attributes.

use super::error::LxdError;
use super::shared_types::DeviceConfig;
use crate::types::InstanceName;
use async_trait::async_trait;

#[async_trait]
pub trait DeviceOps: Send + Sync {
    /// Add a device to an instance, replacing any local device of the same name.
    async fn add_device(
        &self,
        name: &InstanceName,
        device: &str,
        config: &DeviceConfig,
    ) -> Result<(), LxdError>;

    /// Set one attribute of an existing local device.
    async fn set_device(
        &self,
        name: &InstanceName,
        device: &str,
        key: &str,
        value: &str,
    ) -> Result<(), LxdError>;
}
