// ABOUTME: Provisioning orchestrator composing the steps in a fixed order.
// ABOUTME: Create, wait, network, resize, start; the first failure ends the attempt.

use std::sync::Arc;

use crate::config::{Config, PollConfig};
use crate::diagnostics::Diagnostics;
use crate::lxd::Hypervisor;
use crate::types::InstanceKind;

use super::poller::OperationPoller;
use super::provisioning::Provisioning;
use super::result::{Failure, ProvisionResult};
use super::spec::InstanceSpec;
use super::state::{ProvisionState, Stage};
use super::steps::{
    CreateStep, InstanceStarter, LxdNetworkSettings, LxdStartInstance, LxdStorageResize,
    NetworkConfigurator, StorageResizer,
};

/// Settings the orchestrator itself reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub storage_pool: String,
    pub poll: PollConfig,
    pub wait_for_running: bool,
}

impl ProvisionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            storage_pool: config.storage_pool.clone(),
            poll: config.poll.clone(),
            wait_for_running: config.start.wait_for_running,
        }
    }
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Turns an instance specification into a running instance.
///
/// There is no rollback: an instance created before a later step fails is
/// left in place for the caller to inspect or remove.
pub struct Provisioner<
    C: ?Sized,
    N = LxdNetworkSettings<C>,
    R = LxdStorageResize<C>,
    S = LxdStartInstance<C>,
> {
    client: Arc<C>,
    network: N,
    storage: R,
    starter: S,
    settings: ProvisionSettings,
}

impl<C: Hypervisor + ?Sized> Provisioner<C> {
    /// Orchestrator using the LXD implementations of every step.
    pub fn new(client: Arc<C>, config: &Config) -> Self {
        Provisioner {
            network: LxdNetworkSettings::new(Arc::clone(&client), config.network.clone()),
            storage: LxdStorageResize::new(Arc::clone(&client)),
            starter: LxdStartInstance::new(
                Arc::clone(&client),
                config.poll.clone(),
                config.start.clone(),
            ),
            settings: ProvisionSettings::from_config(config),
            client,
        }
    }
}

impl<C, N, R, S> Provisioner<C, N, R, S>
where
    C: Hypervisor + ?Sized,
    N: NetworkConfigurator,
    R: StorageResizer,
    S: InstanceStarter,
{
    /// Orchestrator with caller-supplied collaborator steps.
    pub fn with_steps(
        client: Arc<C>,
        settings: ProvisionSettings,
        network: N,
        storage: R,
        starter: S,
    ) -> Self {
        Provisioner {
            client,
            network,
            storage,
            starter,
            settings,
        }
    }

    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    /// Provision one instance.
    pub async fn provision(&self, spec: &InstanceSpec) -> ProvisionResult {
        let mut diagnostics = Diagnostics::default();
        self.provision_with_diagnostics(spec, &mut diagnostics).await
    }

    /// Provision one instance, collecting non-fatal warnings.
    pub async fn provision_with_diagnostics(
        &self,
        spec: &InstanceSpec,
        diagnostics: &mut Diagnostics,
    ) -> ProvisionResult {
        let client = self.client.as_ref();
        let poller = OperationPoller::new(client, &self.settings.poll);

        let waiting = Provisioning::new(spec.clone())
            .issue_create(&CreateStep::new(client), &self.settings.storage_pool)
            .await;

        let configuring = abort_at(waiting.await_creation(&poller).await, spec)?;
        let resizing = abort_at(configuring.configure_network(&self.network).await, spec)?;
        let starting = resizing.resize_storage(&self.storage, diagnostics).await;

        let result = starting
            .start(&self.starter, self.settings.wait_for_running)
            .await;

        match &result {
            Ok(_) => tracing::info!(instance = %spec.name, stage = %Stage::Succeeded, "instance provisioned"),
            Err(failure) => log_abort(spec, Stage::Starting, failure),
        }
        result
    }
}

/// Log an aborted attempt, attributing it to the stage that failed.
fn abort_at<T: ProvisionState>(
    result: Result<Provisioning<T>, Failure>,
    spec: &InstanceSpec,
) -> Result<Provisioning<T>, Failure> {
    result.inspect_err(|failure| log_abort(spec, previous_stage(T::STAGE), failure))
}

fn previous_stage(reached: Stage) -> Stage {
    match reached {
        Stage::NetworkConfiguring => Stage::Waiting,
        Stage::StorageResizing => Stage::NetworkConfiguring,
        Stage::Starting => Stage::StorageResizing,
        Stage::Succeeded => Stage::Starting,
        other => other,
    }
}

fn log_abort(spec: &InstanceSpec, stage: Stage, failure: &Failure) {
    tracing::warn!(
        instance = %spec.name,
        %stage,
        code = failure.code,
        next = %Stage::Aborted,
        "provisioning aborted: {}",
        failure.message
    );
}

/// Provision an instance from positional arguments, using default settings.
///
/// Invalid names or fingerprints are reported as a failure with code 400
/// before anything is sent to the hypervisor.
#[allow(clippy::too_many_arguments)]
pub async fn provision<C: Hypervisor + ?Sized>(
    client: Arc<C>,
    name: &str,
    fingerprint: &str,
    memory: &str,
    disk: &str,
    cpu: &str,
    address: &str,
    kind: InstanceKind,
) -> ProvisionResult {
    let spec = InstanceSpec::new(name, fingerprint, memory, disk, cpu, address, kind)?;
    Provisioner::new(client, &Config::default())
        .provision(&spec)
        .await
}
