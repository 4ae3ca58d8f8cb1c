// ABOUTME: Config scaffolding for new hypervisor setups.
// ABOUTME: Creates lxd-provision.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, HostConfig};

pub fn init_config(dir: &Path, host: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let host = host
        .map(HostConfig::parse)
        .transpose()
        .map_err(Error::InvalidConfig)?;

    std::fs::write(&config_path, generate_template_yaml(host.as_ref()))?;
    tracing::info!(path = %config_path.display(), "wrote configuration template");

    Ok(())
}

fn generate_template_yaml(host: Option<&HostConfig>) -> String {
    let host_section = match host {
        Some(h) => format!(
            r#"host:
  host: {}
  port: {}
  user: {}
  # SSH host key verification (default: false)
  # Set to true to enable Trust-On-First-Use, or pre-populate ~/.ssh/known_hosts
  # trust_first_connection: true
"#,
            h.host,
            h.port,
            h.user.as_deref().unwrap_or("root")
        ),
        None => r#"# Remote hypervisor reached over SSH (omit to use the local LXD socket)
# host: root@hypervisor.example.com:22
"#
        .to_string(),
    };

    format!(
        r#"{host_section}
# LXD unix socket (auto-detected when omitted)
# socket: /var/snap/lxd/common/lxd/unix.socket

storage_pool: default

network:
  bridge: lxdbr0
  device: eth0

poll:
  wait_timeout: 20s
  retries: 3
  retry_delay: 2s

start:
  wait_for_running: true
  running_timeout: 60s
"#
    )
}
