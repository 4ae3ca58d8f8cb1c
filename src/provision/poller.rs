// ABOUTME: Operation poller: waits for an LXD operation to reach a terminal state.
// ABOUTME: Retries transient transport errors and normalizes every ending to an OperationOutcome.

use crate::config::PollConfig;
use crate::lxd::OperationOps;
use crate::types::OperationId;

use super::result::OperationOutcome;

/// Waits on operation handles.
///
/// Borrowed per provisioning attempt; holds no state between calls.
pub struct OperationPoller<'a, C: ?Sized> {
    client: &'a C,
    config: &'a PollConfig,
}

impl<'a, C: OperationOps + ?Sized> OperationPoller<'a, C> {
    pub fn new(client: &'a C, config: &'a PollConfig) -> Self {
        Self { client, config }
    }

    /// Block until the operation finishes, fails, or is cancelled.
    ///
    /// Wait windows that close while the operation is still running are
    /// reopened. Transport errors are retried up to `retries` times in a row;
    /// after that the transport error itself becomes the failure outcome.
    pub async fn wait(&self, id: &OperationId) -> OperationOutcome {
        let mut transport_failures = 0;

        loop {
            match self.client.wait_operation(id, self.config.wait_timeout).await {
                Ok(status) if status.is_terminal() => {
                    tracing::debug!(
                        operation = %id,
                        status = %status.status,
                        code = status.status_code,
                        "operation finished"
                    );
                    return OperationOutcome::from_status(&status);
                }
                Ok(status) => {
                    tracing::debug!(operation = %id, status = %status.status, "operation still running");
                    transport_failures = 0;
                }
                Err(e) if e.is_transient() && transport_failures < self.config.retries => {
                    transport_failures += 1;
                    tracing::warn!(
                        operation = %id,
                        attempt = transport_failures,
                        "polling failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    tracing::warn!(operation = %id, "polling failed: {}", e);
                    return e.into();
                }
            }
        }
    }
}
