// ABOUTME: LXD control-plane access: capability traits, REST client, socket detection.
// ABOUTME: Local sockets are used directly; remote hypervisors are reached through SSH.

mod client;
mod detection;
mod error;
mod response;
pub mod traits;

pub use client::{LxdClient, connect_local, connect_via_session};
pub use detection::{DetectionError, NATIVE_SOCKET, SNAP_SOCKET, detect_local, detect_remote};
pub use error::{ConnectError, ConnectErrorKind};
pub use traits::*;
