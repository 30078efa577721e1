//! Application input events.
//!
//! [`AppEvent`] is the set of inputs that drive the [`crate::App`] state
//! machine. Events originate from two sources: connection lifecycle
//! reported by the driver, and sync notifications translated from the
//! underlying client by the [`crate::Bridge`].

use banter_core::{ChatMessage, DirectoryEntry, Room, RoomId};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Bus connection in progress.
    Connecting,

    /// Bus connection established.
    Connected,

    /// Bus connection lost.
    Disconnected,

    /// A room was created or joined; carries the full room record so the
    /// view can render name and history immediately.
    RoomJoined {
        /// The joined room's current state.
        room: Room,
    },

    /// A message was appended to a room (local echo or from a peer).
    MessageReceived {
        /// Room the message belongs to.
        room_id: RoomId,
        /// The appended message.
        message: ChatMessage,
        /// Unix millis of the append, for recency ordering.
        at_millis: u64,
    },

    /// The public directory changed.
    DirectoryUpdated {
        /// Full directory snapshot, unordered.
        entries: Vec<DirectoryEntry>,
    },

    /// The entire room set was wiped.
    RoomsCleared,

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
