//! Client events and actions.

use banter_core::{ChatMessage, DirectoryEntry, Room, RoomId};
use banter_proto::MessageKind;

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Forwarding raw bus deliveries (topic + payload)
/// - Driving the periodic announce timer
/// - Forwarding application intents (create, join, send, clear)
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The bus connection was established (or re-established).
    ///
    /// The client responds with the subscriptions it needs: the directory
    /// channel plus one channel per joined room.
    Connected,

    /// The bus connection was lost.
    ///
    /// Outbound publishes are skipped until the next [`Self::Connected`];
    /// local writes still persist.
    Disconnected,

    /// Raw payload delivered from the bus.
    Delivery {
        /// Topic the payload arrived on.
        topic: String,
        /// Raw UTF-8 JSON payload.
        payload: Vec<u8>,
    },

    /// Periodic announce timer fired.
    ///
    /// While connected, every locally held public room is re-announced on
    /// the directory channel. This is the only discovery mechanism: the bus
    /// retains nothing, so cold-starting devices see a room only after its
    /// holder's next announce cycle.
    AnnounceTick,

    /// Application wants to create a new room.
    CreateRoom {
        /// Display name (must be non-empty after trimming).
        name: String,
        /// Whether to announce the room on the public directory.
        is_public: bool,
    },

    /// Application wants to join a room by out-of-band id.
    ///
    /// Optimistic: no validation that the id corresponds to a live room.
    JoinById {
        /// Room id to join (must be non-empty after trimming).
        room_id: RoomId,
    },

    /// Application wants to join a room from the public directory.
    JoinFromDirectory {
        /// The directory entry being joined.
        entry: DirectoryEntry,
    },

    /// Application wants to send a message.
    SendMessage {
        /// Target room.
        room_id: RoomId,
        /// Literal text, or a data-URI string for binary kinds.
        content: String,
        /// Content kind.
        kind: MessageKind,
    },

    /// Application wants to wipe the entire room set.
    ///
    /// Irreversible; user confirmation is the presentation layer's job.
    ClearAll,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Subscribe to a bus topic.
    Subscribe {
        /// Topic to subscribe to.
        topic: String,
    },

    /// Publish a payload to a bus topic. Fire-and-forget.
    Publish {
        /// Topic to publish on.
        topic: String,
        /// Raw UTF-8 JSON payload.
        payload: Vec<u8>,
    },

    /// Persist the full room set.
    ///
    /// Must complete before the triggering operation is considered done; a
    /// failure is surfaced to the caller, never swallowed.
    PersistRooms {
        /// Snapshot of the entire room set.
        rooms: Vec<Room>,
    },

    /// A message was appended to a room's history (local echo or inbound).
    MessageAppended {
        /// Room the message was appended to.
        room_id: RoomId,
        /// The appended message.
        message: ChatMessage,
    },

    /// A room was created or joined; the presentation layer should focus it.
    RoomJoined {
        /// Room to navigate to.
        room_id: RoomId,
    },

    /// The public directory changed; discovery listings should re-render.
    DirectoryChanged,

    /// The entire room set was wiped.
    RoomsCleared,

    /// Diagnostic message for the caller's logger.
    Log {
        /// Log message.
        message: String,
    },
}
