// ABOUTME: Instance provisioning workflow using the type state pattern.
// ABOUTME: Exports the orchestrator, its steps, the operation poller, and result types.

mod poller;
mod provisioner;
mod provisioning;
mod result;
mod spec;
mod state;
pub mod steps;
mod transitions;

pub use poller::OperationPoller;
pub use provisioner::{ProvisionSettings, Provisioner, provision};
pub use provisioning::Provisioning;
pub use result::{Failure, OperationOutcome, ProvisionResult, Started, to_wire};
pub use spec::{InstanceSpec, SpecError};
pub use state::{
    Created, NetworkConfiguring, ProvisionState, Stage, Starting, StorageResizing, Waiting,
};
