// ABOUTME: LXD instance name validation.
// ABOUTME: Names are hostname-like labels unique within the hypervisor.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceNameError {
    #[error("instance name cannot be empty")]
    Empty,

    #[error("instance name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("instance name cannot start with a digit or hyphen")]
    InvalidStart,

    #[error("instance name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("invalid character in instance name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    pub fn new(value: &str) -> Result<Self, InstanceNameError> {
        let Some(first) = value.chars().next() else {
            return Err(InstanceNameError::Empty);
        };

        if value.len() > 63 {
            return Err(InstanceNameError::TooLong);
        }

        if first.is_ascii_digit() || first == '-' {
            return Err(InstanceNameError::InvalidStart);
        }

        if value.ends_with('-') {
            return Err(InstanceNameError::EndsWithHyphen);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(InstanceNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InstanceName {
    type Err = InstanceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
