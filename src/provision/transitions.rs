// ABOUTME: State transition methods for the provisioning workflow.
// ABOUTME: Each method consumes self; failures become the terminal Err value.

use crate::diagnostics::{Diagnostics, Warning};
use crate::lxd::{InstanceOps, OperationOps};

use super::poller::OperationPoller;
use super::provisioning::Provisioning;
use super::result::{Failure, ProvisionResult};
use super::state::{Created, NetworkConfiguring, Starting, StorageResizing, Waiting};
use super::steps::{CreateStep, InstanceStarter, NetworkConfigurator, ROOT_DEVICE, StorageResizer};

impl<S> Provisioning<S> {
    fn transition<T>(self, state: T) -> Provisioning<T> {
        Provisioning {
            spec: self.spec,
            state,
        }
    }
}

// =============================================================================
// Created -> Waiting
// =============================================================================

impl Provisioning<Created> {
    /// Issue the create call.
    ///
    /// Always moves to `Waiting`: an error from issuing the call is carried
    /// along and reported when the creation is awaited.
    #[must_use = "provisioning state must be used"]
    pub async fn issue_create<C: InstanceOps + ?Sized>(
        self,
        step: &CreateStep<'_, C>,
        storage_pool: &str,
    ) -> Provisioning<Waiting> {
        let config = self.spec.instance_config(storage_pool);
        let operation = step
            .create(&self.spec.fingerprint, &self.spec.name, &config)
            .await;
        self.transition(Waiting { operation })
    }
}

// =============================================================================
// Waiting -> NetworkConfiguring
// =============================================================================

impl Provisioning<Waiting> {
    /// Wait for the create operation to finish.
    ///
    /// # Errors
    ///
    /// Returns the hypervisor's message and status code verbatim when the
    /// operation failed, or the normalized transport failure.
    pub async fn await_creation<C: OperationOps + ?Sized>(
        self,
        poller: &OperationPoller<'_, C>,
    ) -> Result<Provisioning<NetworkConfiguring>, Failure> {
        let Provisioning { spec, state } = self;
        let operation = state.operation?;

        poller.wait(&operation).await.into_result()?;
        tracing::info!(instance = %spec.name, operation = %operation, "instance created");

        Ok(Provisioning {
            spec,
            state: NetworkConfiguring,
        })
    }
}

// =============================================================================
// NetworkConfiguring -> StorageResizing
// =============================================================================

impl Provisioning<NetworkConfiguring> {
    /// Assign the static address.
    ///
    /// # Errors
    ///
    /// Returns the network step's own failure unchanged.
    pub async fn configure_network<N: NetworkConfigurator + ?Sized>(
        self,
        step: &N,
    ) -> Result<Provisioning<StorageResizing>, Failure> {
        step.configure(&self.spec.name, &self.spec.address).await?;
        Ok(self.transition(StorageResizing))
    }
}

// =============================================================================
// StorageResizing -> Starting
// =============================================================================

impl Provisioning<StorageResizing> {
    /// Set the root disk size.
    ///
    /// Never fails: the resize outcome does not gate the start. A failed
    /// resize is recorded as a warning.
    #[must_use = "provisioning state must be used"]
    pub async fn resize_storage<R: StorageResizer + ?Sized>(
        self,
        step: &R,
        diagnostics: &mut Diagnostics,
    ) -> Provisioning<Starting> {
        if let Err(failure) = step
            .resize(&self.spec.name, ROOT_DEVICE, &self.spec.disk)
            .await
        {
            diagnostics.warn(Warning::storage_resize(format!(
                "failed to resize {} disk of '{}' to {}: {}",
                ROOT_DEVICE, self.spec.name, self.spec.disk, failure
            )));
        }
        self.transition(Starting)
    }
}

// =============================================================================
// Starting -> Succeeded
// =============================================================================

impl Provisioning<Starting> {
    /// Start the instance. The start step's result is the final result.
    pub async fn start<S: InstanceStarter + ?Sized>(
        self,
        step: &S,
        wait_for_running: bool,
    ) -> ProvisionResult {
        step.start(&self.spec.name, wait_for_running).await
    }
}
