// ABOUTME: In-process SSH server for integration tests, built on russh's server side.
// ABOUTME: Answers `test -S` checks and relays streamlocal channels to local unix sockets.

use lxd_provision::ssh::SessionConfig;
use russh::keys::{load_secret_key, ssh_key};
use russh::server::{self, Auth, Msg, Session};
use russh::{Channel, ChannelId};
use std::collections::HashMap;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UnixStream};
use tokio::task::JoinHandle;

const TEST_USER: &str = "tester";

/// Path of a key pair checked in under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Host key the server presents.
pub fn host_key() -> ssh_key::PrivateKey {
    load_secret_key(fixture("host_key"), None).unwrap()
}

/// `known_hosts` line pinning `key` for the server on `port`.
pub fn known_hosts_line(port: u16, key: &ssh_key::PublicKey) -> String {
    format!("[127.0.0.1]:{} {}\n", port, key.to_openssh().unwrap())
}

/// SSH server on a loopback port, accepting only the fixture client key.
pub struct SshServer {
    port: u16,
    task: JoinHandle<()>,
}

impl SshServer {
    pub async fn start() -> Self {
        let config = Arc::new(server::Config {
            keys: vec![host_key()],
            auth_rejection_time: Duration::ZERO,
            auth_rejection_time_initial: Some(Duration::ZERO),
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let authorized = load_secret_key(fixture("client_key"), None)
            .unwrap()
            .public_key()
            .clone();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = Handler {
                    authorized: authorized.clone(),
                    sessions: HashMap::new(),
                };
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    if let Ok(running) = server::run_stream(config, stream, handler).await {
                        let _ = running.await;
                    }
                });
            }
        });

        Self { port, task }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Client configuration for this server with trust-on-first-use enabled.
    pub fn session_config(&self, known_hosts: &Path) -> SessionConfig {
        SessionConfig::new("127.0.0.1", TEST_USER)
            .port(self.port)
            .key_path(Some(fixture("client_key")))
            .trust_on_first_use(true)
            .known_hosts_path(known_hosts)
    }
}

impl Drop for SshServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Handler {
    authorized: ssh_key::PublicKey,
    sessions: HashMap<ChannelId, Channel<Msg>>,
}

impl server::Handler for Handler {
    type Error = russh::Error;

    async fn auth_publickey(
        &mut self,
        user: &str,
        public_key: &ssh_key::PublicKey,
    ) -> Result<Auth, Self::Error> {
        if user == TEST_USER && public_key.key_data() == self.authorized.key_data() {
            Ok(Auth::Accept)
        } else {
            Ok(Auth::reject())
        }
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        self.sessions.insert(channel.id(), channel);
        Ok(true)
    }

    /// Only `test -S '<path>'` is understood; anything else exits 127.
    async fn exec_request(
        &mut self,
        channel: ChannelId,
        data: &[u8],
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let command = String::from_utf8_lossy(data);
        let exit_status = match command
            .strip_prefix("test -S '")
            .and_then(|rest| rest.strip_suffix('\''))
        {
            Some(path) if is_socket(path) => 0,
            Some(_) => 1,
            None => 127,
        };

        let _ = session.channel_success(channel);
        let _ = session.exit_status_request(channel, exit_status);
        let _ = session.eof(channel);
        let _ = session.close(channel);
        self.sessions.remove(&channel);
        Ok(())
    }

    async fn channel_open_direct_streamlocal(
        &mut self,
        channel: Channel<Msg>,
        socket_path: &str,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        let Ok(mut local) = UnixStream::connect(socket_path).await else {
            return Ok(false);
        };

        tokio::spawn(async move {
            let mut remote = channel.into_stream();
            let _ = tokio::io::copy_bidirectional(&mut local, &mut remote).await;
        });
        Ok(true)
    }
}

fn is_socket(path: &str) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_socket())
        .unwrap_or(false)
}
