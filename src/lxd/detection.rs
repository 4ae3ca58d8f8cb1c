// ABOUTME: LXD socket detection for local and remote systems.
// ABOUTME: Checks $LXD_DIR, then the snap socket, then the native package socket.

use crate::ssh::Session;
use std::path::Path;

/// Error during socket detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no LXD socket found (checked $LXD_DIR, snap and native locations)")]
    NoSocketFound,

    #[error("SSH error: {0}")]
    Ssh(#[from] crate::ssh::Error),
}

pub const SNAP_SOCKET: &str = "/var/snap/lxd/common/lxd/unix.socket";
pub const NATIVE_SOCKET: &str = "/var/lib/lxd/unix.socket";

/// Detect the LXD socket on the local system.
///
/// Detection order:
/// 1. `$LXD_DIR/unix.socket`
/// 2. Snap package socket (`/var/snap/lxd/common/lxd/unix.socket`)
/// 3. Native package socket (`/var/lib/lxd/unix.socket`)
pub fn detect_local() -> Result<String, DetectionError> {
    if let Ok(dir) = std::env::var("LXD_DIR") {
        let socket = format!("{}/unix.socket", dir.trim_end_matches('/'));
        if Path::new(&socket).exists() {
            return Ok(socket);
        }
    }

    [SNAP_SOCKET, NATIVE_SOCKET]
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(str::to_string)
        .ok_or(DetectionError::NoSocketFound)
}

/// Detect the LXD socket on a remote host over SSH.
///
/// An explicit `socket` takes precedence and is not probed.
pub async fn detect_remote(
    session: &Session,
    socket: Option<&str>,
) -> Result<String, DetectionError> {
    if let Some(socket) = socket {
        return Ok(socket.to_string());
    }

    for candidate in [SNAP_SOCKET, NATIVE_SOCKET] {
        if session.socket_exists(candidate).await? {
            tracing::debug!(socket = candidate, "found remote LXD socket");
            return Ok(candidate.to_string());
        }
    }

    Err(DetectionError::NoSocketFound)
}
