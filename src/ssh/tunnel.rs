// ABOUTME: Unix socket tunneling over SSH.
// ABOUTME: Exposes a remote LXD socket as a local socket for the REST client.

use super::error::{Error, Result};
use super::session::SshHandler;
use russh::ChannelMsg;
use russh::client::Handle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

/// A local unix socket whose connections are relayed to a remote socket.
///
/// The relay stops and the local socket file is removed on drop.
pub struct SocketTunnel {
    local_path: PathBuf,
    accept_task: JoinHandle<()>,
}

impl SocketTunnel {
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

impl Drop for SocketTunnel {
    fn drop(&mut self) {
        self.accept_task.abort();
        let _ = std::fs::remove_file(&self.local_path);
    }
}

impl std::fmt::Debug for SocketTunnel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketTunnel")
            .field("local_path", &self.local_path)
            .finish()
    }
}

/// Bind a fresh local socket and relay every connection to `remote_socket`.
pub(crate) fn open(handle: Arc<Handle<SshHandler>>, remote_socket: String) -> Result<SocketTunnel> {
    let local_path = local_socket_path();
    let _ = std::fs::remove_file(&local_path);

    let listener = UnixListener::bind(&local_path).map_err(|e| {
        Error::SocketForwardFailed(format!(
            "failed to bind local socket {}: {}",
            local_path.display(),
            e
        ))
    })?;

    let accept_task = tokio::spawn(accept_loop(listener, handle, remote_socket));

    Ok(SocketTunnel {
        local_path,
        accept_task,
    })
}

fn local_socket_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("lxd-provision-{}-{}.sock", std::process::id(), n))
}

async fn accept_loop(
    listener: UnixListener,
    handle: Arc<Handle<SshHandler>>,
    remote_socket: String,
) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let handle = Arc::clone(&handle);
                let remote_socket = remote_socket.clone();
                tokio::spawn(async move {
                    if let Err(e) = relay(stream, &handle, &remote_socket).await {
                        tracing::debug!("tunnel connection error: {}", e);
                    }
                });
            }
            Err(e) => {
                tracing::warn!("accept error on tunneled socket: {}", e);
                break;
            }
        }
    }
}

/// Copy bytes both ways between a local connection and a streamlocal channel.
async fn relay(
    mut local: UnixStream,
    handle: &Handle<SshHandler>,
    remote_socket: &str,
) -> Result<()> {
    let mut channel = handle
        .channel_open_direct_streamlocal(remote_socket)
        .await
        .map_err(|e| {
            Error::SocketForwardFailed(format!(
                "failed to open streamlocal channel to {}: {}",
                remote_socket, e
            ))
        })?;

    let mut local_eof = false;
    let mut remote_eof = false;
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        tokio::select! {
            r = local.read(&mut buf), if !local_eof => match r? {
                0 => {
                    local_eof = true;
                    let _ = channel.eof().await;
                }
                n => channel.data(&buf[..n]).await?,
            },
            msg = channel.wait(), if !remote_eof => match msg {
                Some(ChannelMsg::Data { ref data }) => local.write_all(data).await?,
                Some(ChannelMsg::Eof) => {
                    remote_eof = true;
                    if local_eof {
                        break;
                    }
                }
                Some(ChannelMsg::Close) | None => break,
                Some(_) => {}
            },
            else => break,
        }
    }

    Ok(())
}
