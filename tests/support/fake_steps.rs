// ABOUTME: Scripted collaborator steps for orchestrator tests.
// ABOUTME: Each fake returns a fixed result and records the arguments it was called with.

use async_trait::async_trait;
use lxd_provision::provision::steps::{InstanceStarter, NetworkConfigurator, StorageResizer};
use lxd_provision::provision::{Failure, ProvisionResult, Started};
use lxd_provision::types::InstanceName;
use parking_lot::Mutex;

pub struct ScriptedNetwork {
    result: Result<(), Failure>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedNetwork {
    pub fn succeeding() -> Self {
        Self::returning(Ok(()))
    }

    pub fn returning(result: Result<(), Failure>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (instance, address) pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NetworkConfigurator for ScriptedNetwork {
    async fn configure(&self, name: &InstanceName, address: &str) -> Result<(), Failure> {
        self.calls
            .lock()
            .push((name.to_string(), address.to_string()));
        self.result.clone()
    }
}

pub struct ScriptedStorage {
    result: Result<(), Failure>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedStorage {
    pub fn succeeding() -> Self {
        Self::returning(Ok(()))
    }

    pub fn returning(result: Result<(), Failure>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (instance, device, size) triples.
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl StorageResizer for ScriptedStorage {
    async fn resize(&self, name: &InstanceName, device: &str, size: &str) -> Result<(), Failure> {
        self.calls
            .lock()
            .push((name.to_string(), device.to_string(), size.to_string()));
        self.result.clone()
    }
}

pub struct ScriptedStarter {
    result: ProvisionResult,
    calls: Mutex<Vec<(String, bool)>>,
}

impl ScriptedStarter {
    pub fn succeeding(instance: &str) -> Self {
        Self::returning(Ok(Started {
            instance: instance.to_string(),
            status: None,
        }))
    }

    pub fn returning(result: ProvisionResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (instance, wait_for_running) pairs.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl InstanceStarter for ScriptedStarter {
    async fn start(&self, name: &InstanceName, wait_for_running: bool) -> ProvisionResult {
        self.calls.lock().push((name.to_string(), wait_for_running));
        self.result.clone()
    }
}
