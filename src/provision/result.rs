// ABOUTME: Uniform result types shared by every provisioning step.
// ABOUTME: Failure carries a message and code; collaborators' results pass through as values.

use serde::{Deserialize, Serialize};

use crate::lxd::{ConnectError, InstanceStatus, LxdError, OperationStatus, TRANSPORT_FAILURE_CODE};

/// Why a step (and therefore the whole provisioning attempt) failed.
///
/// Transport errors, hypervisor operation errors, and collaborator failures
/// all share this shape so callers never branch on where an error came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct Failure {
    pub message: String,
    pub code: i64,
}

impl Failure {
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl From<LxdError> for Failure {
    fn from(err: LxdError) -> Self {
        match err {
            // LXD's own message is kept verbatim.
            LxdError::Api { code, message } => Failure { message, code },
            other => Failure {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }
}

/// A hypervisor that cannot be reached fails before any step runs.
impl From<ConnectError> for Failure {
    fn from(err: ConnectError) -> Self {
        let code = match &err {
            ConnectError::Unreachable { source } => source.code(),
            ConnectError::Detection { .. } | ConnectError::Tunnel { .. } => TRANSPORT_FAILURE_CODE,
        };
        Failure {
            message: err.to_string(),
            code,
        }
    }
}

/// Payload of a successful start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Started {
    pub instance: String,
    /// Reported status, present when the start step waited for Running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceStatus>,
}

/// Output of the start step and of the whole orchestrator.
pub type ProvisionResult = Result<Started, Failure>;

/// Wire shape of a provisioning result.
///
/// Failures render as `{"error": {"message": ..., "code": ...}}`; successes
/// render the start payload as-is.
pub fn to_wire(result: &ProvisionResult) -> serde_json::Value {
    match result {
        Ok(started) => serde_json::json!(started),
        Err(failure) => serde_json::json!({ "error": failure }),
    }
}

/// Normalized terminal state of an asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Failure(Failure),
}

impl OperationOutcome {
    /// Interpret a terminal operation status.
    ///
    /// A non-empty `err` or a Failure/Cancelled status code is a failure;
    /// the code is the operation's status code, unchanged.
    pub fn from_status(status: &OperationStatus) -> Self {
        if !status.is_failure() {
            return OperationOutcome::Success;
        }
        let message = if status.err.is_empty() {
            status.status.clone()
        } else {
            status.err.clone()
        };
        OperationOutcome::Failure(Failure::new(message, status.status_code))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success)
    }

    pub fn into_result(self) -> Result<(), Failure> {
        match self {
            OperationOutcome::Success => Ok(()),
            OperationOutcome::Failure(failure) => Err(failure),
        }
    }
}

impl From<LxdError> for OperationOutcome {
    fn from(err: LxdError) -> Self {
        OperationOutcome::Failure(err.into())
    }
}
