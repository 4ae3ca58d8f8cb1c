// ABOUTME: Image fingerprint validation.
// ABOUTME: Fingerprints are hex content hashes, full or as a unique prefix.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("image fingerprint cannot be empty")]
    Empty,

    #[error("image fingerprint exceeds 64 characters")]
    TooLong,

    #[error("invalid character in image fingerprint: '{0}'")]
    InvalidChar(char),
}

/// Content hash identifying a local image.
///
/// LXD accepts any unique prefix of the SHA-256 fingerprint, so short values
/// are allowed. Input is normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: &str) -> Result<Self, FingerprintError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FingerprintError::Empty);
        }

        if value.len() > 64 {
            return Err(FingerprintError::TooLong);
        }

        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(FingerprintError::InvalidChar(c));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
