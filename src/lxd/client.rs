// ABOUTME: hyper-based LXD REST client over a unix socket.
// ABOUTME: Implements the capability traits against the local or SSH-forwarded socket.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Method;
use hyper_util::rt::TokioIo;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;

use super::detection::{detect_local, detect_remote};
use super::error::ConnectError;
use super::response::Envelope;
use super::traits::{
    DeviceConfig, DeviceOps, InstanceConfig, InstanceOps, InstanceStatus, LxdError,
    OperationOps, OperationStatus,
};
use crate::ssh::{Session, SocketTunnel};
use crate::types::{Fingerprint, InstanceName, OperationId};

const API_ROOT: &str = "/1.0";

/// Body of `POST /1.0/instances`.
#[derive(Serialize)]
struct InstancesPost<'a> {
    name: &'a str,
    source: ImageSource<'a>,
    #[serde(flatten)]
    config: &'a InstanceConfig,
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    fingerprint: &'a str,
}

/// LXD client talking HTTP/1.1 to a unix socket.
///
/// Each request opens its own connection, so one client can serve concurrent
/// provisioning requests without locking.
pub struct LxdClient {
    socket_path: PathBuf,
    /// Keeps an SSH-forwarded socket alive for as long as the client.
    _tunnel: Option<SocketTunnel>,
}

impl std::fmt::Debug for LxdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LxdClient")
            .field("socket_path", &self.socket_path)
            .field("tunneled", &self._tunnel.is_some())
            .finish()
    }
}

impl LxdClient {
    /// Create a client for the given socket path.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            _tunnel: None,
        }
    }

    fn with_tunnel(tunnel: SocketTunnel) -> Self {
        Self {
            socket_path: tunnel.local_path().to_path_buf(),
            _tunnel: Some(tunnel),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Check the API answers at all.
    pub async fn ping(&self) -> Result<(), LxdError> {
        self.request(Method::GET, API_ROOT, None).await.map(|_| ())
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Envelope, LxdError> {
        tracing::debug!(%method, path, "LXD request");

        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| LxdError::Connect {
                path: self.socket_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| LxdError::Transport(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("LXD connection error: {}", e);
            }
        });

        let payload = match body {
            Some(value) => Bytes::from(
                serde_json::to_vec(&value).map_err(|e| LxdError::Decode(e.to_string()))?,
            ),
            None => Bytes::new(),
        };

        let req = hyper::Request::builder()
            .method(method)
            .uri(path)
            .header("Host", "lxd")
            .header("Content-Type", "application/json")
            .header("User-Agent", concat!("lxd-provision/", env!("CARGO_PKG_VERSION")))
            .body(Full::new(payload))
            .map_err(|e| LxdError::Transport(format!("failed to build request: {}", e)))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| LxdError::Transport(format!("request failed: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| LxdError::Transport(format!("failed to read response: {}", e)))?
            .to_bytes();

        Envelope::decode(status, &body)
    }

    fn instance_path(name: &InstanceName) -> String {
        format!(
            "{}/instances/{}",
            API_ROOT,
            urlencoding::encode(name.as_str())
        )
    }

    async fn patch_devices(
        &self,
        name: &InstanceName,
        device: &str,
        config: &DeviceConfig,
    ) -> Result<(), LxdError> {
        // PATCH merges per device name; devices not named here are kept.
        let body = json!({ "devices": { device: config } });
        self.request(Method::PATCH, &Self::instance_path(name), Some(body))
            .await
            .map(|_| ())
    }
}

/// Connect to LXD on this machine.
///
/// An explicit socket path skips detection.
pub async fn connect_local(socket: Option<&str>) -> Result<LxdClient, ConnectError> {
    let socket_path = match socket {
        Some(path) => path.to_string(),
        None => detect_local()?,
    };
    let client = LxdClient::new(socket_path);
    client.ping().await?;
    Ok(client)
}

/// Connect to LXD on a remote host via an SSH session.
///
/// Forwards the remote LXD socket to a local one and returns a client
/// talking through the tunnel.
pub async fn connect_via_session(
    session: &Session,
    socket: Option<&str>,
) -> Result<LxdClient, ConnectError> {
    let remote_socket = detect_remote(session, socket).await?;
    let tunnel = session.forward_socket(&remote_socket).await?;
    tracing::debug!(
        remote = %remote_socket,
        local = %tunnel.local_path().display(),
        "forwarding LXD socket"
    );

    let client = LxdClient::with_tunnel(tunnel);
    client.ping().await?;
    Ok(client)
}

#[async_trait]
impl InstanceOps for LxdClient {
    async fn create_instance(
        &self,
        fingerprint: &Fingerprint,
        name: &InstanceName,
        config: &InstanceConfig,
    ) -> Result<OperationId, LxdError> {
        let post = InstancesPost {
            name: name.as_str(),
            source: ImageSource {
                kind: "image",
                fingerprint: fingerprint.as_str(),
            },
            config,
        };
        let body = serde_json::to_value(&post).map_err(|e| LxdError::Decode(e.to_string()))?;

        self.request(Method::POST, &format!("{}/instances", API_ROOT), Some(body))
            .await?
            .into_operation()
    }

    async fn start_instance(&self, name: &InstanceName) -> Result<OperationId, LxdError> {
        let body = json!({
            "action": "start",
            "timeout": -1,
            "force": false,
            "stateful": false,
        });
        let path = format!("{}/state", Self::instance_path(name));

        self.request(Method::PUT, &path, Some(body))
            .await?
            .into_operation()
    }

    async fn instance_state(&self, name: &InstanceName) -> Result<InstanceStatus, LxdError> {
        let path = format!("{}/state", Self::instance_path(name));
        self.request(Method::GET, &path, None)
            .await?
            .into_metadata()
    }

    async fn instance_exists(&self, name: &InstanceName) -> Result<bool, LxdError> {
        match self
            .request(Method::GET, &Self::instance_path(name), None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl OperationOps for LxdClient {
    async fn wait_operation(
        &self,
        id: &OperationId,
        timeout: Option<Duration>,
    ) -> Result<OperationStatus, LxdError> {
        let timeout = timeout.map_or(-1, |t| {
            i64::try_from(t.as_secs().max(1)).unwrap_or(i64::MAX)
        });
        let path = format!(
            "{}/operations/{}/wait?timeout={}",
            API_ROOT,
            urlencoding::encode(id.as_str()),
            timeout
        );

        self.request(Method::GET, &path, None)
            .await?
            .into_metadata()
    }
}

#[async_trait]
impl DeviceOps for LxdClient {
    async fn add_device(
        &self,
        name: &InstanceName,
        device: &str,
        config: &DeviceConfig,
    ) -> Result<(), LxdError> {
        self.patch_devices(name, device, config).await
    }

    async fn set_device(
        &self,
        name: &InstanceName,
        device: &str,
        key: &str,
        value: &str,
    ) -> Result<(), LxdError> {
        #[derive(serde::Deserialize)]
        struct LocalDevices {
            #[serde(default)]
            devices: std::collections::BTreeMap<String, DeviceConfig>,
        }

        let instance: LocalDevices = self
            .request(Method::GET, &Self::instance_path(name), None)
            .await?
            .into_metadata()?;

        let mut config = instance
            .devices
            .get(device)
            .cloned()
            .ok_or_else(|| LxdError::Api {
                code: 404,
                message: format!("device '{}' not found on instance '{}'", device, name),
            })?;
        config.insert(key.to_string(), value.to_string());

        self.patch_devices(name, device, &config).await
    }
}
