// ABOUTME: In-memory LXD fake implementing the hypervisor capability traits.
// ABOUTME: Records every call and lets tests script failures per operation.

use async_trait::async_trait;
use lxd_provision::lxd::{
    DeviceConfig, DeviceOps, InstanceConfig, InstanceOps, InstanceStatus, LxdError,
    OperationOps, OperationStatus,
};
use lxd_provision::types::{Fingerprint, InstanceName, OperationId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

/// A call made against the fake, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateInstance {
        name: String,
        fingerprint: String,
        config: InstanceConfig,
    },
    WaitOperation(String),
    AddDevice {
        name: String,
        device: String,
        config: DeviceConfig,
    },
    SetDevice {
        name: String,
        device: String,
        key: String,
        value: String,
    },
    StartInstance(String),
    InstanceState(String),
    InstanceExists(String),
}

/// An instance as the fake hypervisor sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeInstance {
    pub config: InstanceConfig,
    pub devices: BTreeMap<String, DeviceConfig>,
    pub running: bool,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    instances: BTreeMap<String, FakeInstance>,
    operations: HashMap<String, OperationStatus>,
    wait_script: VecDeque<Result<OperationStatus, LxdError>>,
    next_operation: u64,
    create_call_error: Option<LxdError>,
    create_operation_failure: Option<(String, i64)>,
    device_error: Option<LxdError>,
    resize_error: Option<LxdError>,
    start_operation_failure: Option<(String, i64)>,
    never_running: bool,
}

#[derive(Default)]
pub struct FakeLxd {
    state: Mutex<State>,
}

pub fn status(status: &str, status_code: i64, err: &str) -> OperationStatus {
    OperationStatus {
        id: "scripted".to_string(),
        description: String::new(),
        status: status.to_string(),
        status_code,
        err: err.to_string(),
        created_at: None,
        updated_at: None,
    }
}

impl FakeLxd {
    pub fn new() -> Self {
        Self::default()
    }

    /// The create call itself fails (nothing reaches the hypervisor).
    pub fn failing_create_call(self, error: LxdError) -> Self {
        self.state.lock().create_call_error = Some(error);
        self
    }

    /// The create call is accepted but its operation ends in error.
    pub fn failing_create_operation(self, err: &str, status_code: i64) -> Self {
        self.state.lock().create_operation_failure = Some((err.to_string(), status_code));
        self
    }

    /// Every device call fails with `error`.
    pub fn failing_devices(self, error: LxdError) -> Self {
        self.state.lock().device_error = Some(error);
        self
    }

    /// Only `set_device` fails with `error`.
    pub fn failing_resize(self, error: LxdError) -> Self {
        self.state.lock().resize_error = Some(error);
        self
    }

    /// The start operation ends in error.
    pub fn failing_start_operation(self, err: &str, status_code: i64) -> Self {
        self.state.lock().start_operation_failure = Some((err.to_string(), status_code));
        self
    }

    /// Started instances never report Running.
    pub fn never_running(self) -> Self {
        self.state.lock().never_running = true;
        self
    }

    /// Responses returned by `wait_operation` before the real operation table.
    pub fn with_wait_script(self, script: Vec<Result<OperationStatus, LxdError>>) -> Self {
        self.state.lock().wait_script = script.into();
        self
    }

    /// Pre-existing instance, e.g. to provoke duplicate names.
    pub fn with_instance(self, name: &str) -> Self {
        self.state.lock().instances.insert(
            name.to_string(),
            FakeInstance {
                config: InstanceConfig {
                    profiles: Vec::new(),
                    config: BTreeMap::new(),
                    devices: BTreeMap::new(),
                    kind: Default::default(),
                },
                devices: BTreeMap::new(),
                running: true,
            },
        );
        self
    }

    /// Register an operation with a fixed terminal status.
    pub fn register_operation(&self, status: OperationStatus) -> OperationId {
        let mut state = self.state.lock();
        Self::insert_operation(&mut state, status)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn instance(&self, name: &str) -> Option<FakeInstance> {
        self.state.lock().instances.get(name).cloned()
    }

    fn insert_operation(state: &mut State, mut status: OperationStatus) -> OperationId {
        state.next_operation += 1;
        let id = format!("op-{}", state.next_operation);
        status.id = id.clone();
        state.operations.insert(id.clone(), status);
        OperationId::new(id)
    }

    fn not_found(what: &str) -> LxdError {
        LxdError::Api {
            code: 404,
            message: format!("{} not found", what),
        }
    }
}

#[async_trait]
impl InstanceOps for FakeLxd {
    async fn create_instance(
        &self,
        fingerprint: &Fingerprint,
        name: &InstanceName,
        config: &InstanceConfig,
    ) -> Result<OperationId, LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::CreateInstance {
            name: name.to_string(),
            fingerprint: fingerprint.to_string(),
            config: config.clone(),
        });

        if let Some(error) = state.create_call_error.clone() {
            return Err(error);
        }

        let outcome = if let Some((err, code)) = state.create_operation_failure.clone() {
            status("Failure", code, &err)
        } else if state.instances.contains_key(name.as_str()) {
            status(
                "Failure",
                400,
                &format!("Instance \"{}\" already exists", name),
            )
        } else {
            state.instances.insert(
                name.to_string(),
                FakeInstance {
                    config: config.clone(),
                    devices: config.devices.clone(),
                    running: false,
                },
            );
            status("Success", 200, "")
        };

        Ok(Self::insert_operation(&mut state, outcome))
    }

    async fn start_instance(&self, name: &InstanceName) -> Result<OperationId, LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::StartInstance(name.to_string()));

        let failure = state.start_operation_failure.clone();
        let never_running = state.never_running;
        let instance = state
            .instances
            .get_mut(name.as_str())
            .ok_or_else(|| Self::not_found("Instance"))?;

        let outcome = match failure {
            Some((err, code)) => status("Failure", code, &err),
            None => {
                instance.running = !never_running;
                status("Success", 200, "")
            }
        };

        Ok(Self::insert_operation(&mut state, outcome))
    }

    async fn instance_state(&self, name: &InstanceName) -> Result<InstanceStatus, LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::InstanceState(name.to_string()));

        let instance = state
            .instances
            .get(name.as_str())
            .ok_or_else(|| Self::not_found("Instance"))?;

        Ok(if instance.running {
            InstanceStatus {
                status: "Running".to_string(),
                status_code: 103,
            }
        } else {
            InstanceStatus {
                status: "Stopped".to_string(),
                status_code: 102,
            }
        })
    }

    async fn instance_exists(&self, name: &InstanceName) -> Result<bool, LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::InstanceExists(name.to_string()));
        Ok(state.instances.contains_key(name.as_str()))
    }
}

#[async_trait]
impl OperationOps for FakeLxd {
    async fn wait_operation(
        &self,
        id: &OperationId,
        _timeout: Option<Duration>,
    ) -> Result<OperationStatus, LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::WaitOperation(id.to_string()));

        if let Some(scripted) = state.wait_script.pop_front() {
            return scripted;
        }

        state
            .operations
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("Operation"))
    }
}

#[async_trait]
impl DeviceOps for FakeLxd {
    async fn add_device(
        &self,
        name: &InstanceName,
        device: &str,
        config: &DeviceConfig,
    ) -> Result<(), LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::AddDevice {
            name: name.to_string(),
            device: device.to_string(),
            config: config.clone(),
        });

        if let Some(error) = state.device_error.clone() {
            return Err(error);
        }

        let instance = state
            .instances
            .get_mut(name.as_str())
            .ok_or_else(|| Self::not_found("Instance"))?;
        instance.devices.insert(device.to_string(), config.clone());
        Ok(())
    }

    async fn set_device(
        &self,
        name: &InstanceName,
        device: &str,
        key: &str,
        value: &str,
    ) -> Result<(), LxdError> {
        let mut state = self.state.lock();
        state.calls.push(Call::SetDevice {
            name: name.to_string(),
            device: device.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });

        if let Some(error) = state.resize_error.clone().or_else(|| state.device_error.clone()) {
            return Err(error);
        }

        let instance = state
            .instances
            .get_mut(name.as_str())
            .ok_or_else(|| Self::not_found("Instance"))?;
        let config = instance
            .devices
            .get_mut(device)
            .ok_or_else(|| Self::not_found("Device"))?;
        config.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
