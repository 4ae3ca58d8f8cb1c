// ABOUTME: Composable capability traits for the LXD control plane.
// ABOUTME: Defines InstanceOps, OperationOps, DeviceOps and the Hypervisor umbrella trait.

mod device;
mod error;
mod instance;
mod operation;
mod shared_types;

pub use device::DeviceOps;
pub use error::{BAD_RESPONSE_CODE, LxdError, TRANSPORT_FAILURE_CODE};
pub use instance::InstanceOps;
pub use operation::OperationOps;
pub use shared_types::*;

/// Every capability the provisioning workflow needs from a hypervisor client.
///
/// Blanket-implemented, so any type providing the individual capabilities
/// (including test fakes) is a `Hypervisor`.
pub trait Hypervisor: InstanceOps + OperationOps + DeviceOps {}

impl<T: InstanceOps + OperationOps + DeviceOps + ?Sized> Hypervisor for T {}
