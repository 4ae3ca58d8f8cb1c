// ABOUTME: Connection error types with SNAFU pattern.
// ABOUTME: Unifies socket detection, SSH tunnel, and API reachability failures.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::LxdError;

/// Unified error for establishing a working LXD client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConnectError {
    #[snafu(display("LXD socket detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("SSH tunnel failed: {source}"))]
    Tunnel { source: crate::ssh::Error },

    #[snafu(display("LXD API unreachable: {source}"))]
    Unreachable { source: LxdError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectErrorKind {
    /// No LXD socket found on the target system.
    NoSocketFound,
    /// SSH error while reaching a remote hypervisor.
    SshError,
    /// The socket exists but the API did not answer.
    ApiUnreachable,
}

impl ConnectError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ConnectErrorKind {
        match self {
            ConnectError::Detection { source } => match source {
                DetectionError::NoSocketFound => ConnectErrorKind::NoSocketFound,
                DetectionError::Ssh(_) => ConnectErrorKind::SshError,
            },
            ConnectError::Tunnel { .. } => ConnectErrorKind::SshError,
            ConnectError::Unreachable { .. } => ConnectErrorKind::ApiUnreachable,
        }
    }
}

impl From<DetectionError> for ConnectError {
    fn from(source: DetectionError) -> Self {
        ConnectError::Detection { source }
    }
}

impl From<crate::ssh::Error> for ConnectError {
    fn from(source: crate::ssh::Error) -> Self {
        ConnectError::Tunnel { source }
    }
}

impl From<LxdError> for ConnectError {
    fn from(source: LxdError) -> Self {
        ConnectError::Unreachable { source }
    }
}
