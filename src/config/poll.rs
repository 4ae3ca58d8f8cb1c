// ABOUTME: Operation polling configuration.
// ABOUTME: Per-request wait window and transient error retry policy.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Server-side wait window for a single wait request. `None` blocks until
    /// the operation finishes. Operations still running when the window
    /// closes are waited on again; this is not an overall deadline.
    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub wait_timeout: Option<Duration>,

    /// Consecutive transport failures tolerated while polling.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_retry_delay", with = "humantime_serde")]
    pub retry_delay: Duration,
}

fn default_wait_timeout() -> Option<Duration> {
    // Below the SSH tunnel's inactivity timeout so a forwarded wait never idles out.
    Some(Duration::from_secs(20))
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(2)
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            wait_timeout: default_wait_timeout(),
            retries: default_retries(),
            retry_delay: default_retry_delay(),
        }
    }
}
