// ABOUTME: Storage resize step: sets the size of an instance's disk device.
// ABOUTME: The orchestrator does not act on its result.

use async_trait::async_trait;
use std::sync::Arc;

use crate::lxd::DeviceOps;
use crate::provision::Failure;
use crate::types::InstanceName;

#[async_trait]
pub trait StorageResizer: Send + Sync {
    async fn resize(&self, name: &InstanceName, device: &str, size: &str) -> Result<(), Failure>;
}

#[async_trait]
impl<T: StorageResizer + ?Sized> StorageResizer for Arc<T> {
    async fn resize(&self, name: &InstanceName, device: &str, size: &str) -> Result<(), Failure> {
        (**self).resize(name, device, size).await
    }
}

pub struct LxdStorageResize<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> LxdStorageResize<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: DeviceOps + ?Sized> StorageResizer for LxdStorageResize<C> {
    async fn resize(&self, name: &InstanceName, device: &str, size: &str) -> Result<(), Failure> {
        tracing::info!(instance = %name, device, size, "resizing disk");
        self.client
            .set_device(name, device, "size", size)
            .await
            .map_err(Failure::from)
    }
}
