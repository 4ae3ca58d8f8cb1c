// ABOUTME: Canned LXD API server on a temporary unix socket.
// ABOUTME: Records each request and answers from a caller-supplied route function.

use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

/// A request as received by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Response returned by a route: HTTP status and raw body.
pub type Reply = (u16, String);

pub struct SocketServer {
    _dir: TempDir,
    path: PathBuf,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: JoinHandle<()>,
}

impl SocketServer {
    /// Serve `route` on a fresh socket until dropped.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unix.socket");
        let listener = UnixListener::bind(&path).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let route = Arc::new(route);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let route = Arc::clone(&route);
                tokio::spawn(async move {
                    serve(stream, route.as_ref(), &recorded).await;
                });
            }
        });

        Self {
            _dir: dir,
            path,
            requests,
            task,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }
}

impl Drop for SocketServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Answer one request. The request is recorded before the reply is written.
async fn serve<F>(mut stream: UnixStream, route: &F, recorded: &Mutex<Vec<Recorded>>) -> Option<()>
where
    F: Fn(&Recorded) -> Reply,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let raw_body = &buf[header_end..(header_end + content_length).min(buf.len())];
    let body = if raw_body.is_empty() {
        None
    } else {
        serde_json::from_slice(raw_body).ok()
    };

    let request = Recorded { method, path, body };
    let (status, reply) = route(&request);
    recorded.lock().push(request);

    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok();
    Some(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// `{"type":"sync", ...}` envelope around `metadata`.
pub fn sync(metadata: Value) -> Reply {
    (
        200,
        serde_json::json!({
            "type": "sync",
            "status": "Success",
            "status_code": 200,
            "metadata": metadata,
        })
        .to_string(),
    )
}

/// `{"type":"async", ...}` envelope pointing at operation `id`.
pub fn async_op(id: &str) -> Reply {
    (
        202,
        serde_json::json!({
            "type": "async",
            "status": "Operation created",
            "status_code": 100,
            "operation": format!("/1.0/operations/{}", id),
            "metadata": { "id": id, "status": "Running", "status_code": 103 },
        })
        .to_string(),
    )
}

/// `{"type":"error", ...}` envelope.
pub fn error(code: u16, message: &str) -> Reply {
    (
        code,
        serde_json::json!({
            "type": "error",
            "error": message,
            "error_code": code,
        })
        .to_string(),
    )
}
