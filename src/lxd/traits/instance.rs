// ABOUTME: Instance operations trait for the LXD control plane.
// ABOUTME: Create from image, start, and query instance state.

use super::error::LxdError;
use super::shared_types::{InstanceConfig, InstanceStatus};
use crate::types::{Fingerprint, InstanceName, OperationId};
use async_trait::async_trait;

/// Instance lifecycle operations.
#[async_trait]
pub trait InstanceOps: Send + Sync {
    /// Request creation of an instance from a local image.
    ///
    /// Returns as soon as LXD has accepted the request; completion is tracked
    /// through the returned operation.
    async fn create_instance(
        &self,
        fingerprint: &Fingerprint,
        name: &InstanceName,
        config: &InstanceConfig,
    ) -> Result<OperationId, LxdError>;

    /// Request that a stopped instance be started.
    async fn start_instance(&self, name: &InstanceName) -> Result<OperationId, LxdError>;

    /// Current runtime status of an instance.
    async fn instance_state(&self, name: &InstanceName) -> Result<InstanceStatus, LxdError>;

    /// Check if an instance exists.
    async fn instance_exists(&self, name: &InstanceName) -> Result<bool, LxdError>;
}
