// ABOUTME: Network configuration step: static address on the primary NIC.
// ABOUTME: Must run after the instance exists and before it starts.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::config::NetworkConfig;
use crate::lxd::{DeviceConfig, DeviceOps};
use crate::provision::Failure;
use crate::types::InstanceName;

/// Assigns a static address to a created, not yet started, instance.
#[async_trait]
pub trait NetworkConfigurator: Send + Sync {
    async fn configure(&self, name: &InstanceName, address: &str) -> Result<(), Failure>;
}

#[async_trait]
impl<T: NetworkConfigurator + ?Sized> NetworkConfigurator for Arc<T> {
    async fn configure(&self, name: &InstanceName, address: &str) -> Result<(), Failure> {
        (**self).configure(name, address).await
    }
}

/// Attaches the primary NIC to the managed bridge with a fixed IPv4 address.
pub struct LxdNetworkSettings<C: ?Sized> {
    client: Arc<C>,
    network: NetworkConfig,
}

impl<C: ?Sized> LxdNetworkSettings<C> {
    pub fn new(client: Arc<C>, network: NetworkConfig) -> Self {
        Self { client, network }
    }

    fn nic_device(&self, address: Ipv4Addr) -> DeviceConfig {
        BTreeMap::from([
            ("type".to_string(), "nic".to_string()),
            ("name".to_string(), self.network.device.clone()),
            ("network".to_string(), self.network.bridge.clone()),
            ("ipv4.address".to_string(), address.to_string()),
        ])
    }
}

#[async_trait]
impl<C: DeviceOps + ?Sized> NetworkConfigurator for LxdNetworkSettings<C> {
    async fn configure(&self, name: &InstanceName, address: &str) -> Result<(), Failure> {
        let address: Ipv4Addr = address
            .trim()
            .parse()
            .map_err(|_| Failure::new(format!("invalid IPv4 address '{}'", address), 400))?;

        tracing::info!(
            instance = %name,
            device = %self.network.device,
            bridge = %self.network.bridge,
            %address,
            "configuring network"
        );

        self.client
            .add_device(name, &self.network.device, &self.nic_device(address))
            .await
            .map_err(Failure::from)
    }
}
