// ABOUTME: The individual provisioning steps and their collaborator contracts.
// ABOUTME: Every step reports through the shared Failure type so results pass through unchanged.

mod create;
mod network;
mod start;
mod storage;

pub use create::CreateStep;
pub use network::{LxdNetworkSettings, NetworkConfigurator};
pub use start::{InstanceStarter, LxdStartInstance};
pub use storage::{LxdStorageResize, StorageResizer};

/// Name of the root disk device.
pub const ROOT_DEVICE: &str = "root";
