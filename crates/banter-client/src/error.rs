//! Client error types.
//!
//! Errors here are local input validation only: they abort the triggering
//! operation before any network or storage side effect. Inbound failures
//! (malformed payloads, unknown rooms, self-echoes) are deliberately NOT
//! errors. They are dropped fail-safe so one bad peer message cannot
//! disrupt the session.

use banter_core::RoomId;
use thiserror::Error;

/// Errors from client operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Room creation was attempted with an empty name.
    #[error("room name must not be empty")]
    EmptyRoomName,

    /// Join was attempted with an empty room id.
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// Send was attempted with empty text content.
    #[error("message must not be empty")]
    EmptyMessage,

    /// Operation targets a room this device has not joined.
    #[error("room not found: {room_id}")]
    RoomNotFound {
        /// The room id that was not found.
        room_id: RoomId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ClientError::RoomNotFound { room_id: "abc".to_string() };
        assert_eq!(err.to_string(), "room not found: abc");
    }
}
