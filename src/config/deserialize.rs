// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts the remote host as a "user@host:port" string or a map.

use serde::Deserialize;

use super::HostConfig;

pub fn deserialize_host<'de, D>(deserializer: D) -> Result<Option<HostConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entry: Option<HostEntry> = Option::deserialize(deserializer)?;
    entry
        .map(HostEntry::into_host_config)
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostEntry {
    Simple(String),
    Detailed(HostConfig),
}

impl HostEntry {
    fn into_host_config(self) -> Result<HostConfig, String> {
        match self {
            HostEntry::Simple(s) => HostConfig::parse(&s),
            HostEntry::Detailed(c) => Ok(c),
        }
    }
}
