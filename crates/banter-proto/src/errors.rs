//! Protocol error types.
//!
//! Decode failures are always recoverable: the caller drops the payload and
//! keeps the subscription alive (fail-safe, not fail-fast).

use thiserror::Error;

/// Errors from encoding or decoding bus payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload is not valid JSON or does not match the expected shape.
    #[error("malformed payload: {reason}")]
    Malformed {
        /// Description of the decode failure.
        reason: String,
    },

    /// Payload could not be serialized to JSON.
    ///
    /// Only reachable for pathological inputs; the wire structs themselves
    /// always serialize.
    #[error("encode failed: {reason}")]
    Encode {
        /// Description of the encode failure.
        reason: String,
    },
}

impl ProtocolError {
    pub(crate) fn malformed(err: &serde_json::Error) -> Self {
        Self::Malformed { reason: err.to_string() }
    }

    pub(crate) fn encode(err: &serde_json::Error) -> Self {
        Self::Encode { reason: err.to_string() }
    }
}
