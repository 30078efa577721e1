//! Persisted data model.
//!
//! These shapes are what the local store serializes. They deliberately carry
//! no transport state: subscriptions are reconstructed from the room set at
//! connect time, not persisted.

use banter_proto::{Announcement, MessageKind, WireMessage};
use serde::{Deserialize, Serialize};

use crate::env::Environment;

/// Room identifier.
///
/// Locally generated on creation (8 base36 chars) or supplied externally on
/// join. Uniqueness is best-effort.
pub type RoomId = String;

/// Length of generated room ids.
const ROOM_ID_LEN: usize = 8;

/// Length of the random part of identity ids.
const IDENTITY_ID_LEN: usize = 6;

/// Placeholder display name for rooms joined by raw id.
const JOINED_ROOM_NAME: &str = "Joined Chat";

/// Local device identity.
///
/// Created once on first login and immutable thereafter. The id is a locally
/// generated pseudo-random token; nothing authenticates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identity id (`u_` + 6 base36 chars).
    pub id: String,
    /// Display name chosen at first login.
    pub display_name: String,
}

impl Identity {
    /// Generate a fresh identity with the given display name.
    pub fn generate<E: Environment>(env: &E, display_name: impl Into<String>) -> Self {
        Self { id: format!("u_{}", env.token(IDENTITY_ID_LEN)), display_name: display_name.into() }
    }
}

/// A message in a room's local history.
///
/// Immutable once created; histories are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identity id of the sender.
    pub sender_id: String,
    /// Sender's display name at send time.
    pub sender_name: String,
    /// Literal text, or a data-URI string for binary kinds.
    pub content: String,
    /// Content kind.
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Build the local record for an inbound wire message.
    pub fn from_wire(wire: WireMessage) -> Self {
        Self {
            sender_id: wire.sender_id,
            sender_name: wire.sender_name,
            content: wire.txt,
            kind: wire.kind,
        }
    }

    /// Build the wire form of this message for publication.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            sender_id: self.sender_id.clone(),
            sender_name: self.sender_name.clone(),
            txt: self.content.clone(),
            kind: self.kind,
        }
    }
}

/// A room this device participates in.
///
/// Set semantics by id: at most one `Room` per id in the local room set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room id.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Whether this room is announced on the public directory.
    pub is_public: bool,
    /// Local message history, in arrival order at this device.
    pub messages: Vec<ChatMessage>,
    /// Unix millis of the last local append (creation time before that).
    pub last_activity: u64,
}

impl Room {
    /// Generate a fresh room id (8 base36 chars).
    pub fn generate_id<E: Environment>(env: &E) -> RoomId {
        env.token(ROOM_ID_LEN)
    }

    /// Create a freshly-created room with empty history.
    pub fn new(id: RoomId, name: impl Into<String>, is_public: bool, now_millis: u64) -> Self {
        Self { id, name: name.into(), is_public, messages: Vec::new(), last_activity: now_millis }
    }

    /// Create the local record for a room joined by raw id.
    ///
    /// The real name is unknown (join is optimistic, no existence check), so
    /// a placeholder is used.
    pub fn joined_by_id(id: RoomId, now_millis: u64) -> Self {
        Self::new(id, JOINED_ROOM_NAME, false, now_millis)
    }

    /// Create the local record for a room joined from a directory entry.
    pub fn from_directory(entry: &DirectoryEntry, now_millis: u64) -> Self {
        Self::new(entry.id.clone(), entry.name.clone(), true, now_millis)
    }

    /// Append a message at the tail and bump recency.
    pub fn append(&mut self, message: ChatMessage, now_millis: u64) {
        self.messages.push(message);
        self.last_activity = now_millis;
    }

    /// Most recent message, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Lightweight public-room advertisement held in the directory.
///
/// Distinct from full [`Room`] state: no messages, no ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Advertised room id.
    pub id: RoomId,
    /// Advertised room name.
    pub name: String,
}

impl From<Announcement> for DirectoryEntry {
    fn from(ann: Announcement) -> Self {
        Self { id: ann.id, name: ann.name }
    }
}

impl From<&DirectoryEntry> for Announcement {
    fn from(entry: &DirectoryEntry) -> Self {
        Self { id: entry.id.clone(), name: entry.name.clone() }
    }
}
