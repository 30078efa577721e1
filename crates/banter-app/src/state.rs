//! Observable application state types.
//!
//! These structures are the view model for the presentation layer: the
//! subset of sync state needed for rendering, decoupled from the client's
//! internal bookkeeping.

use banter_core::{ChatMessage, Room, RoomId};

/// Connection state of the bus link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the bus.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected; subscriptions are live.
    Connected,
}

/// Per-room presentation state.
#[derive(Debug, Clone)]
pub struct RoomView {
    /// Room id.
    pub room_id: RoomId,
    /// Display name.
    pub name: String,
    /// Whether the room is announced on the public directory.
    pub is_public: bool,
    /// Messages in arrival order.
    pub messages: Vec<ChatMessage>,
    /// Unix millis of last activity; drives the recency-ordered room list.
    pub last_activity: u64,
    /// Room has messages the user has not seen.
    pub unread: bool,
}

impl RoomView {
    /// Build presentation state from a room record.
    pub fn from_room(room: &Room) -> Self {
        Self {
            room_id: room.id.clone(),
            name: room.name.clone(),
            is_public: room.is_public,
            messages: room.messages.clone(),
            last_activity: room.last_activity,
            unread: false,
        }
    }

    /// Most recent message, for list previews.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
