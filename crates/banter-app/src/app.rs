//! Application state machine.
//!
//! [`App`] manages the interactive state of the application completely
//! decoupled from I/O and sync mechanics: it consumes [`crate::AppEvent`]
//! inputs and produces [`crate::AppAction`] instructions for the runtime.
//!
//! # Responsibilities
//!
//! - Tracks the room list (recency ordered), unread badges, and the
//!   currently active room.
//! - Mirrors the public directory for the discovery listing.
//! - Tracks high-level connection state for UI feedback.

use std::collections::HashMap;

use banter_core::{DirectoryEntry, RoomId};
use banter_proto::MessageKind;

use crate::{AppAction, AppEvent, ConnectionState, RoomView};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Per-room presentation state.
    rooms: HashMap<RoomId, RoomView>,
    /// Currently active room. `None` if no room is selected.
    active_room: Option<RoomId>,
    /// Public directory snapshot, keyed by room id.
    directory: HashMap<RoomId, DirectoryEntry>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App with no rooms and an empty directory.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            rooms: HashMap::new(),
            active_room: None,
            directory: HashMap::new(),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.state = ConnectionState::Connected;
                self.status_message = Some("Connected".to_string());
                vec![AppAction::Render]
            },
            AppEvent::Disconnected => {
                self.state = ConnectionState::Disconnected;
                self.status_message = Some("Connection lost".to_string());
                vec![AppAction::Render]
            },
            AppEvent::RoomJoined { room } => {
                let view = RoomView::from_room(&room);
                self.rooms.insert(view.room_id.clone(), view);
                // Joining always navigates to the room.
                self.active_room = Some(room.id);
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { room_id, message, at_millis } => {
                if let Some(room) = self.rooms.get_mut(&room_id) {
                    room.messages.push(message);
                    room.last_activity = at_millis;
                    if self.active_room.as_deref() != Some(room_id.as_str()) {
                        room.unread = true;
                    }
                }
                vec![AppAction::Render]
            },
            AppEvent::DirectoryUpdated { entries } => {
                self.directory =
                    entries.into_iter().map(|e| (e.id.clone(), e)).collect();
                vec![AppAction::Render]
            },
            AppEvent::RoomsCleared => {
                self.rooms.clear();
                self.active_room = None;
                self.status_message = Some("All rooms cleared".to_string());
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Create a new room with the given name.
    pub fn create_room(&mut self, name: impl Into<String>, is_public: bool) -> Vec<AppAction> {
        let name = name.into();
        self.status_message = Some(format!("Creating room {name}..."));
        vec![AppAction::CreateRoom { name, is_public }, AppAction::Render]
    }

    /// Join a room by an id shared out of band.
    pub fn join_by_id(&self, room_id: RoomId) -> Vec<AppAction> {
        vec![AppAction::JoinById { room_id }, AppAction::Render]
    }

    /// Join a room from the public directory.
    pub fn join_from_directory(&self, entry: DirectoryEntry) -> Vec<AppAction> {
        vec![AppAction::JoinFromDirectory { entry }, AppAction::Render]
    }

    /// Send a message to the specified room.
    pub fn send_message(
        &self,
        room_id: RoomId,
        content: String,
        kind: MessageKind,
    ) -> Vec<AppAction> {
        vec![AppAction::SendMessage { room_id, content, kind }, AppAction::Render]
    }

    /// Wipe all rooms. Confirmation is the caller's responsibility.
    pub fn clear_all(&self) -> Vec<AppAction> {
        vec![AppAction::ClearAll, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set the active room and clear its unread badge.
    pub fn set_active_room(&mut self, room_id: &str) {
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.unread = false;
            self.active_room = Some(room_id.to_string());
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Rooms ordered by recency (most recent activity first, id tie-break).
    pub fn rooms_by_recency(&self) -> Vec<&RoomView> {
        let mut rooms: Vec<&RoomView> = self.rooms.values().collect();
        rooms.sort_by(|a, b| {
            b.last_activity.cmp(&a.last_activity).then(a.room_id.cmp(&b.room_id))
        });
        rooms
    }

    /// Look up a room view by id.
    pub fn room(&self, room_id: &str) -> Option<&RoomView> {
        self.rooms.get(room_id)
    }

    /// Currently selected room id. `None` if no rooms joined.
    pub fn active_room(&self) -> Option<&str> {
        self.active_room.as_deref()
    }

    /// State of the currently selected room.
    pub fn active_room_view(&self) -> Option<&RoomView> {
        self.active_room.as_ref().and_then(|id| self.rooms.get(id))
    }

    /// Directory listing sorted by name for stable rendering.
    pub fn directory_listing(&self) -> Vec<&DirectoryEntry> {
        let mut entries: Vec<&DirectoryEntry> = self.directory.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        entries
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use banter_core::{ChatMessage, Room};

    use super::*;

    fn room(id: &str, last_activity: u64) -> Room {
        Room::new(id.to_string(), format!("Room {id}"), true, last_activity)
    }

    fn message(txt: &str) -> ChatMessage {
        ChatMessage {
            sender_id: "u_peer".to_string(),
            sender_name: "Peer".to_string(),
            content: txt.to_string(),
            kind: MessageKind::Text,
        }
    }

    #[test]
    fn room_joined_navigates_to_room() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::RoomJoined { room: room("r1", 10) });
        assert_eq!(app.active_room(), Some("r1"));
    }

    #[test]
    fn message_in_inactive_room_sets_unread() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::RoomJoined { room: room("r1", 10) });
        let _ = app.handle(AppEvent::RoomJoined { room: room("r2", 20) });

        // r2 is active, r1 is not.
        let _ = app.handle(AppEvent::MessageReceived {
            room_id: "r1".to_string(),
            message: message("hi"),
            at_millis: 30,
        });
        let _ = app.handle(AppEvent::MessageReceived {
            room_id: "r2".to_string(),
            message: message("yo"),
            at_millis: 31,
        });

        assert!(app.room("r1").unwrap().unread);
        assert!(!app.room("r2").unwrap().unread);
    }

    #[test]
    fn activating_a_room_clears_unread() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::RoomJoined { room: room("r1", 10) });
        let _ = app.handle(AppEvent::RoomJoined { room: room("r2", 20) });
        let _ = app.handle(AppEvent::MessageReceived {
            room_id: "r1".to_string(),
            message: message("hi"),
            at_millis: 30,
        });

        app.set_active_room("r1");
        assert!(!app.room("r1").unwrap().unread);
        assert_eq!(app.active_room(), Some("r1"));
    }

    #[test]
    fn recency_list_follows_last_activity() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::RoomJoined { room: room("a", 10) });
        let _ = app.handle(AppEvent::RoomJoined { room: room("b", 20) });
        let _ = app.handle(AppEvent::MessageReceived {
            room_id: "a".to_string(),
            message: message("bump"),
            at_millis: 30,
        });

        let order: Vec<&str> =
            app.rooms_by_recency().iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn directory_listing_is_sorted_by_name() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::DirectoryUpdated {
            entries: vec![
                DirectoryEntry { id: "r2".to_string(), name: "Zeta".to_string() },
                DirectoryEntry { id: "r1".to_string(), name: "Alpha".to_string() },
            ],
        });

        let names: Vec<&str> = app.directory_listing().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn rooms_cleared_resets_everything() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::RoomJoined { room: room("r1", 10) });
        let _ = app.handle(AppEvent::RoomsCleared);

        assert!(app.rooms_by_recency().is_empty());
        assert_eq!(app.active_room(), None);
    }

    #[test]
    fn rejoin_replaces_view_with_authoritative_state() {
        let mut app = App::new();
        let mut r = room("r1", 10);
        r.append(message("kept"), 15);
        let _ = app.handle(AppEvent::RoomJoined { room: r });

        assert_eq!(app.room("r1").unwrap().messages.len(), 1);
    }

    #[test]
    fn api_create_room() {
        let mut app = App::new();
        let actions = app.create_room("Sprint", true);
        assert!(matches!(actions.as_slice(), [
            AppAction::CreateRoom { is_public: true, .. },
            AppAction::Render
        ]));
        assert!(app.status_message().is_some());
    }

    #[test]
    fn api_send_message() {
        let app = App::new();
        let actions =
            app.send_message("r1".to_string(), "hello".to_string(), MessageKind::Text);
        assert!(matches!(actions.as_slice(), [
            AppAction::SendMessage { .. },
            AppAction::Render
        ]));
    }

    #[test]
    fn error_event_surfaces_status() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::Error { message: "save failed".to_string() });
        assert_eq!(app.status_message(), Some("Error: save failed"));
    }
}
