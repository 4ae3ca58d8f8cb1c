// ABOUTME: Operation tracking trait for the LXD control plane.
// ABOUTME: Wait on asynchronous operations returned by mutating calls.

use super::error::LxdError;
use super::shared_types::OperationStatus;
use crate::types::OperationId;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait OperationOps: Send + Sync {
    /// Block server-side until the operation finishes or `timeout` elapses.
    ///
    /// `None` waits without limit. When the window closes first, the returned
    /// status is non-terminal.
    async fn wait_operation(
        &self,
        id: &OperationId,
        timeout: Option<Duration>,
    ) -> Result<OperationStatus, LxdError>;
}
