// ABOUTME: Instance start step.
// ABOUTME: Starts the instance and optionally waits until LXD reports it Running.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::Instant;

use crate::config::{PollConfig, StartConfig};
use crate::lxd::{InstanceOps, InstanceStatus, OperationOps};
use crate::provision::{Failure, OperationPoller, ProvisionResult, Started};
use crate::types::InstanceName;

/// Code reported when an instance never reaches Running in time.
pub const START_TIMEOUT_CODE: i64 = 408;

/// Starts an instance. Its result is the orchestrator's result.
#[async_trait]
pub trait InstanceStarter: Send + Sync {
    async fn start(&self, name: &InstanceName, wait_for_running: bool) -> ProvisionResult;
}

#[async_trait]
impl<T: InstanceStarter + ?Sized> InstanceStarter for Arc<T> {
    async fn start(&self, name: &InstanceName, wait_for_running: bool) -> ProvisionResult {
        (**self).start(name, wait_for_running).await
    }
}

pub struct LxdStartInstance<C: ?Sized> {
    client: Arc<C>,
    poll: PollConfig,
    start: StartConfig,
}

impl<C: ?Sized> LxdStartInstance<C> {
    pub fn new(client: Arc<C>, poll: PollConfig, start: StartConfig) -> Self {
        Self {
            client,
            poll,
            start,
        }
    }
}

impl<C: InstanceOps + OperationOps + ?Sized> LxdStartInstance<C> {
    async fn wait_until_running(&self, name: &InstanceName) -> Result<InstanceStatus, Failure> {
        let deadline = Instant::now() + self.start.running_timeout;

        loop {
            let status = self.client.instance_state(name).await?;
            if status.is_running() {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                return Err(Failure::new(
                    format!(
                        "instance '{}' did not reach Running within {}s (last status: {})",
                        name,
                        self.start.running_timeout.as_secs(),
                        status.status
                    ),
                    START_TIMEOUT_CODE,
                ));
            }

            tokio::time::sleep(self.start.check_interval).await;
        }
    }
}

#[async_trait]
impl<C: InstanceOps + OperationOps + ?Sized> InstanceStarter for LxdStartInstance<C> {
    async fn start(&self, name: &InstanceName, wait_for_running: bool) -> ProvisionResult {
        tracing::info!(instance = %name, wait_for_running, "starting instance");

        let operation = self.client.start_instance(name).await?;

        if !wait_for_running {
            return Ok(Started {
                instance: name.to_string(),
                status: None,
            });
        }

        OperationPoller::new(self.client.as_ref(), &self.poll)
            .wait(&operation)
            .await
            .into_result()?;

        let status = self.wait_until_running(name).await?;
        Ok(Started {
            instance: name.to_string(),
            status: Some(status),
        })
    }
}
