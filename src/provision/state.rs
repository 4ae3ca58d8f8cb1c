// ABOUTME: Provisioning state marker types for the type state pattern.
// ABOUTME: Each state only exposes the transition that may follow it.

use std::fmt;

use crate::types::OperationId;

use super::result::Failure;

/// Stage of a provisioning attempt, for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    Waiting,
    NetworkConfiguring,
    StorageResizing,
    Starting,
    Succeeded,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::Waiting => "waiting",
            Stage::NetworkConfiguring => "network-configuring",
            Stage::StorageResizing => "storage-resizing",
            Stage::Starting => "starting",
            Stage::Succeeded => "succeeded",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Implemented by every state marker.
pub trait ProvisionState {
    const STAGE: Stage;
}

/// Initial state: nothing has been sent to the hypervisor yet.
/// Available actions: `issue_create()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Created;

/// Create issued; the operation (or the error from issuing it) is pending.
/// Available actions: `await_creation()`
#[derive(Debug)]
pub struct Waiting {
    pub(crate) operation: Result<OperationId, Failure>,
}

/// Instance exists, not yet networked.
/// Available actions: `configure_network()`
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConfiguring;

/// Network configured.
/// Available actions: `resize_storage()`
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageResizing;

/// Disk resize issued.
/// Available actions: `start()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Starting;

impl ProvisionState for Created {
    const STAGE: Stage = Stage::Created;
}

impl ProvisionState for Waiting {
    const STAGE: Stage = Stage::Waiting;
}

impl ProvisionState for NetworkConfiguring {
    const STAGE: Stage = Stage::NetworkConfiguring;
}

impl ProvisionState for StorageResizing {
    const STAGE: Stage = Stage::StorageResizing;
}

impl ProvisionState for Starting {
    const STAGE: Stage = Stage::Starting;
}
