//! Application side-effects and intents.
//!
//! [`AppAction`] values are instructions produced by the [`crate::App`]
//! state machine (or pushed directly by the presentation layer as user
//! intents) for the runtime to execute.

use banter_core::{DirectoryEntry, RoomId};
use banter_proto::MessageKind;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Create a new room.
    CreateRoom {
        /// Display name for the room.
        name: String,
        /// Whether to announce the room on the public directory.
        is_public: bool,
    },

    /// Join a room by an id shared out of band.
    JoinById {
        /// Room id to join.
        room_id: RoomId,
    },

    /// Join a room from the public directory.
    JoinFromDirectory {
        /// The directory entry being joined.
        entry: DirectoryEntry,
    },

    /// Send a message to a joined room.
    SendMessage {
        /// Target room.
        room_id: RoomId,
        /// Literal text, or a data-URI string for binary kinds.
        content: String,
        /// Content kind.
        kind: MessageKind,
    },

    /// Wipe the entire room set, local and persisted.
    ClearAll,
}
