// ABOUTME: Configuration types and parsing for lxd-provision.yml.
// ABOUTME: Handles YAML parsing, defaults, and config file discovery.

mod deserialize;
mod host;
mod init;
mod network;
mod poll;
mod start;

pub use host::HostConfig;
pub use init::init_config;
pub use network::NetworkConfig;
pub use poll::PollConfig;
pub use start::StartConfig;

use crate::error::{Error, Result};
use deserialize::deserialize_host;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "lxd-provision.yml";
pub const CONFIG_FILENAME_ALT: &str = "lxd-provision.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".lxd-provision/config.yml";

/// Storage pool used for the root disk when none is configured.
pub const DEFAULT_STORAGE_POOL: &str = "default";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Remote hypervisor reached over SSH. Absent means the local LXD socket.
    #[serde(default, deserialize_with = "deserialize_host")]
    pub host: Option<HostConfig>,

    /// Explicit LXD socket path (local, or on the remote host).
    #[serde(default)]
    pub socket: Option<String>,

    #[serde(default = "default_storage_pool")]
    pub storage_pool: String,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub start: StartConfig,
}

fn default_storage_pool() -> String {
    DEFAULT_STORAGE_POOL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            socket: None,
            storage_pool: default_storage_pool(),
            network: NetworkConfig::default(),
            poll: PollConfig::default(),
            start: StartConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is valid and means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like `discover`, but falls back to defaults when no file exists.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage_pool.trim().is_empty() {
            return Err(Error::InvalidConfig("storage_pool cannot be empty".into()));
        }
        if self.network.bridge.trim().is_empty() {
            return Err(Error::InvalidConfig("network.bridge cannot be empty".into()));
        }
        if self.network.device.trim().is_empty() {
            return Err(Error::InvalidConfig("network.device cannot be empty".into()));
        }
        Ok(())
    }
}
