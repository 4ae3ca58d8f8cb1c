// ABOUTME: Shared types used across LXD trait definitions.
// ABOUTME: InstanceConfig wire document, OperationStatus, InstanceStatus, DeviceConfig.

use crate::types::InstanceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Device definition: LXD devices are flat string maps.
pub type DeviceConfig = BTreeMap<String, String>;

/// Configuration document sent with an instance create request.
///
/// Field names are part of the LXD API and serialize verbatim. Values in
/// `config` are always strings, matching LXD's string-typed schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceConfig {
    pub profiles: Vec<String>,
    pub config: BTreeMap<String, String>,
    pub devices: BTreeMap<String, DeviceConfig>,
    #[serde(rename = "type")]
    pub kind: InstanceKind,
}

/// LXD operation status codes.
pub mod status_code {
    pub const RUNNING: i64 = 103;
    pub const SUCCESS: i64 = 200;
}

/// Snapshot of an operation as reported by `/1.0/operations/{id}/wait`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperationStatus {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub status_code: i64,
    #[serde(default)]
    pub err: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OperationStatus {
    /// Whether the operation has finished (successfully or not).
    ///
    /// Codes below 200 are in-progress states. Error text always ends it.
    pub fn is_terminal(&self) -> bool {
        !self.err.is_empty() || self.status_code >= status_code::SUCCESS
    }

    /// Whether a finished operation ended in error or was cancelled.
    pub fn is_failure(&self) -> bool {
        !self.err.is_empty() || self.status_code != status_code::SUCCESS
    }
}

/// Runtime status of an instance from `/1.0/instances/{name}/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceStatus {
    pub status: String,
    pub status_code: i64,
}

impl InstanceStatus {
    pub fn is_running(&self) -> bool {
        self.status_code == status_code::RUNNING
    }
}
