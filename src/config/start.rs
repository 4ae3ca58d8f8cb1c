// ABOUTME: Instance start configuration.
// ABOUTME: Whether and how long to wait for the instance to report Running.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartConfig {
    #[serde(default = "default_wait_for_running")]
    pub wait_for_running: bool,

    #[serde(default = "default_running_timeout", with = "humantime_serde")]
    pub running_timeout: Duration,

    #[serde(default = "default_check_interval", with = "humantime_serde")]
    pub check_interval: Duration,
}

fn default_wait_for_running() -> bool {
    true
}

fn default_running_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_check_interval() -> Duration {
    Duration::from_millis(500)
}

impl Default for StartConfig {
    fn default() -> Self {
        StartConfig {
            wait_for_running: default_wait_for_running(),
            running_timeout: default_running_timeout(),
            check_interval: default_check_interval(),
        }
    }
}
