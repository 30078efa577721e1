//! JSON payload shapes.
//!
//! Field names are part of the wire contract and must not change: peers on
//! other platforms parse these as plain JSON with no schema negotiation.

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Lightweight advertisement of a public room's existence.
///
/// Published on the directory topic. Distinct from full room state: no
/// messages, no ownership, no membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Room id being advertised.
    pub id: String,
    /// Display name of the room.
    pub name: String,
}

impl Announcement {
    /// Encode to UTF-8 JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(|e| ProtocolError::encode(&e))
    }

    /// Decode from UTF-8 JSON bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(payload).map_err(|e| ProtocolError::malformed(&e))
    }
}

/// Content kind of a room message.
///
/// Binary kinds carry their content as a data-URI string in the `txt` field;
/// producing that encoding is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Literal text content.
    Text,
    /// Image content as a data-URI string.
    #[serde(rename = "img")]
    Image,
    /// Audio content as a data-URI string.
    Audio,
}

/// A room message as it crosses the bus.
///
/// The sender stamps its own identity; receivers use `from` for self-echo
/// suppression (each room has one shared channel, so a device receives its
/// own publishes back).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Sender's identity id.
    #[serde(rename = "from")]
    pub sender_id: String,
    /// Sender's display name at send time.
    #[serde(rename = "name")]
    pub sender_name: String,
    /// Message content: literal text, or a data-URI string for binary kinds.
    pub txt: String,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl WireMessage {
    /// Encode to UTF-8 JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(|e| ProtocolError::encode(&e))
    }

    /// Decode from UTF-8 JSON bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(payload).map_err(|e| ProtocolError::malformed(&e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn announcement_uses_wire_field_names() {
        let ann = Announcement { id: "r1".to_string(), name: "Sprint".to_string() };
        let json: serde_json::Value = serde_json::from_slice(&ann.encode().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"id": "r1", "name": "Sprint"}));
    }

    #[test]
    fn message_uses_wire_field_names() {
        let msg = WireMessage {
            sender_id: "u_abc".to_string(),
            sender_name: "Ada".to_string(),
            txt: "hello".to_string(),
            kind: MessageKind::Text,
        };
        let json: serde_json::Value = serde_json::from_slice(&msg.encode().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from": "u_abc", "name": "Ada", "txt": "hello", "type": "text"})
        );
    }

    #[test]
    fn kind_tags_match_peers() {
        for (kind, tag) in [
            (MessageKind::Text, "\"text\""),
            (MessageKind::Image, "\"img\""),
            (MessageKind::Audio, "\"audio\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), tag);
        }
    }

    #[test]
    fn decodes_peer_message() {
        let payload = br#"{"from":"u_x","name":"Bo","txt":"hi","type":"audio"}"#;
        let msg = WireMessage::decode(payload).unwrap();
        assert_eq!(msg.kind, MessageKind::Audio);
        assert_eq!(msg.sender_id, "u_x");
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        assert!(WireMessage::decode(b"{not json").is_err());
        assert!(WireMessage::decode(b"{}").is_err());
        assert!(Announcement::decode(b"[1,2,3]").is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let payload = br#"{"from":"u_x","name":"Bo","txt":"hi","type":"video"}"#;
        assert!(WireMessage::decode(payload).is_err());
    }
}
