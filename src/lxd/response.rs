// ABOUTME: Decoding of the LXD REST response envelope.
// ABOUTME: Maps sync, async and error responses to typed results.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::traits::LxdError;
use crate::types::OperationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResponseKind {
    Sync,
    Async,
    Error,
}

/// Standard envelope wrapping every LXD API response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Envelope {
    /// Decode a raw HTTP response body.
    ///
    /// Error envelopes become `LxdError::Api` with LXD's own code and message.
    /// Bodies that are not an envelope at all fall back to the HTTP status.
    pub fn decode(status: u16, body: &[u8]) -> Result<Self, LxdError> {
        let envelope: Envelope = match serde_json::from_slice(body) {
            Ok(envelope) => envelope,
            Err(_) if !(200..300).contains(&status) => {
                return Err(LxdError::Http {
                    status,
                    body: String::from_utf8_lossy(body).trim().to_string(),
                });
            }
            Err(e) => return Err(LxdError::Decode(e.to_string())),
        };

        if envelope.kind == ResponseKind::Error {
            let code = if envelope.error_code != 0 {
                envelope.error_code
            } else {
                i64::from(status)
            };
            return Err(LxdError::Api {
                code,
                message: envelope.error,
            });
        }

        Ok(envelope)
    }

    /// Extract the operation handle from an async response.
    pub fn into_operation(self) -> Result<OperationId, LxdError> {
        if self.kind != ResponseKind::Async {
            return Err(LxdError::UnexpectedResponse(format!(
                "expected async response, got {:?}",
                self.kind
            )));
        }
        OperationId::from_operation_url(&self.operation).ok_or_else(|| {
            LxdError::UnexpectedResponse(format!(
                "async response has no operation id: '{}'",
                self.operation
            ))
        })
    }

    /// Deserialize the metadata payload.
    pub fn into_metadata<T: DeserializeOwned>(self) -> Result<T, LxdError> {
        serde_json::from_value(self.metadata).map_err(|e| LxdError::Decode(e.to_string()))
    }
}
