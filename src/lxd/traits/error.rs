// ABOUTME: Errors from calls to the LXD REST API.
// ABOUTME: Every variant carries a numeric code so failures normalize to one shape.

/// HTTP-ish code reported when the transport itself failed.
pub const TRANSPORT_FAILURE_CODE: i64 = 503;
/// Code reported when LXD answered with something unreadable.
pub const BAD_RESPONSE_CODE: i64 = 502;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LxdError {
    #[error("failed to connect to LXD socket {path}: {reason}")]
    Connect { path: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { code: i64, message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode LXD response: {0}")]
    Decode(String),

    #[error("unexpected LXD response: {0}")]
    UnexpectedResponse(String),
}

impl LxdError {
    /// Numeric code for this error, used as the failure code.
    pub fn code(&self) -> i64 {
        match self {
            LxdError::Connect { .. } | LxdError::Transport(_) => TRANSPORT_FAILURE_CODE,
            LxdError::Api { code, .. } => *code,
            LxdError::Http { status, .. } => i64::from(*status),
            LxdError::Decode(_) | LxdError::UnexpectedResponse(_) => BAD_RESPONSE_CODE,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LxdError::Connect { .. } | LxdError::Transport(_))
    }

    /// Returns true for a 404 reported by LXD.
    pub fn is_not_found(&self) -> bool {
        self.code() == 404 && !self.is_transient()
    }
}
