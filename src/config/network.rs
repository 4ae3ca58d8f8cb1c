// ABOUTME: Network settings applied to new instances.
// ABOUTME: Bridge network and NIC device name used for the static address.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// LXD managed network the NIC is attached to.
    #[serde(default = "default_bridge")]
    pub bridge: String,

    /// Name of the primary NIC device.
    #[serde(default = "default_device")]
    pub device: String,
}

fn default_bridge() -> String {
    "lxdbr0".to_string()
}

fn default_device() -> String {
    "eth0".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            bridge: default_bridge(),
            device: default_device(),
        }
    }
}
