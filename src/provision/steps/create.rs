// ABOUTME: Instance create step.
// ABOUTME: Issues the create-from-image call and hands back the operation handle without waiting.

use crate::lxd::{InstanceConfig, InstanceOps};
use crate::provision::Failure;
use crate::types::{Fingerprint, InstanceName, OperationId};

pub struct CreateStep<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: InstanceOps + ?Sized> CreateStep<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Request creation of `name` from the image `fingerprint`.
    ///
    /// Rejections (e.g. a duplicate name) are returned as LXD reported them.
    pub async fn create(
        &self,
        fingerprint: &Fingerprint,
        name: &InstanceName,
        config: &InstanceConfig,
    ) -> Result<OperationId, Failure> {
        tracing::info!(instance = %name, image = %fingerprint, kind = %config.kind, "creating instance");
        self.client
            .create_instance(fingerprint, name, config)
            .await
            .map_err(Failure::from)
    }
}
