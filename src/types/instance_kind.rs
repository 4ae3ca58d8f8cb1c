// ABOUTME: Instance kind: OS-level container or full virtual machine.
// ABOUTME: Serialized with the exact strings the LXD API expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceKind {
    #[default]
    Container,
    VirtualMachine,
}

impl InstanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceKind::Container => "container",
            InstanceKind::VirtualMachine => "virtual-machine",
        }
    }

    pub fn is_virtual_machine(&self) -> bool {
        matches!(self, InstanceKind::VirtualMachine)
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown instance kind '{0}' (expected 'container' or 'virtual-machine')")]
pub struct ParseInstanceKindError(pub String);

impl FromStr for InstanceKind {
    type Err = ParseInstanceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(InstanceKind::Container),
            "virtual-machine" => Ok(InstanceKind::VirtualMachine),
            other => Err(ParseInstanceKindError(other.to_string())),
        }
    }
}
