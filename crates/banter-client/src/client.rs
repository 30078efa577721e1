//! Client state machine.
//!
//! The `Client` is the session context that owns the local identity, the
//! joined room set, and the public room directory, and orchestrates all
//! synchronization against the shared bus. There are no ambient globals:
//! everything the handlers touch lives on this struct.

use std::collections::{HashMap, hash_map::Entry};

use banter_core::{ChatMessage, DirectoryEntry, Identity, Room, RoomId, env::Environment};
use banter_proto::{Announcement, MessageKind, Route, TopicSpace, WireMessage};

use crate::{
    error::ClientError,
    event::{ClientAction, ClientEvent},
};

/// Directory entry every device starts with, so discovery is never empty on
/// a cold start.
const DEFAULT_LOUNGE_ID: &str = "global_lounge";
const DEFAULT_LOUNGE_NAME: &str = "Global Lounge";

/// Synchronization state machine for one device.
pub struct Client<E: Environment> {
    /// Environment for time and randomness.
    env: E,

    /// Local identity; immutable for the session.
    identity: Identity,

    /// Topic namespace shared by all peers of this deployment.
    topics: TopicSpace,

    /// Whether the bus currently reports a live connection. Publishes are
    /// skipped while false; local persistence continues regardless.
    connected: bool,

    /// Joined rooms, keyed by id (set semantics).
    rooms: HashMap<RoomId, Room>,

    /// Known public rooms, keyed by id. Superset view, last writer wins;
    /// absence here does not imply a room does not exist.
    directory: HashMap<RoomId, DirectoryEntry>,
}

impl<E: Environment> Client<E> {
    /// Create a client from persisted state.
    ///
    /// `rooms` is whatever the local store loaded (empty on first run).
    /// Duplicate ids in the loaded set collapse to the first occurrence.
    pub fn new(env: E, identity: Identity, topics: TopicSpace, rooms: Vec<Room>) -> Self {
        let mut room_map = HashMap::with_capacity(rooms.len());
        for room in rooms {
            room_map.entry(room.id.clone()).or_insert(room);
        }

        let mut directory = HashMap::new();
        directory.insert(
            DEFAULT_LOUNGE_ID.to_string(),
            DirectoryEntry {
                id: DEFAULT_LOUNGE_ID.to_string(),
                name: DEFAULT_LOUNGE_NAME.to_string(),
            },
        );

        Self { env, identity, topics, connected: false, rooms: room_map, directory }
    }

    /// Local identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Topic namespace this client operates in.
    pub fn topics(&self) -> &TopicSpace {
        &self.topics
    }

    /// Whether the bus currently reports a live connection.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of joined rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Check membership by room id.
    pub fn is_member(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Look up a joined room by id.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Joined rooms ordered by recency (most recent activity first).
    ///
    /// Ties break by id so the ordering is stable for rendering.
    pub fn rooms_by_recency(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| b.last_activity.cmp(&a.last_activity).then(a.id.cmp(&b.id)));
        rooms
    }

    /// Snapshot of the public directory. Order is unspecified.
    pub fn directory_entries(&self) -> Vec<DirectoryEntry> {
        self.directory.values().cloned().collect()
    }

    /// Look up a directory entry by room id.
    pub fn directory_entry(&self, room_id: &str) -> Option<&DirectoryEntry> {
        self.directory.get(room_id)
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Connected => Ok(self.handle_connected()),
            ClientEvent::Disconnected => Ok(self.handle_disconnected()),
            ClientEvent::Delivery { topic, payload } => Ok(self.handle_delivery(&topic, &payload)),
            ClientEvent::AnnounceTick => Ok(self.handle_announce_tick()),
            ClientEvent::CreateRoom { name, is_public } => {
                self.handle_create_room(&name, is_public)
            },
            ClientEvent::JoinById { room_id } => self.handle_join_by_id(&room_id),
            ClientEvent::JoinFromDirectory { entry } => Ok(self.handle_join_from_directory(entry)),
            ClientEvent::SendMessage { room_id, content, kind } => {
                self.handle_send_message(&room_id, content, kind)
            },
            ClientEvent::ClearAll => Ok(self.handle_clear_all()),
        }
    }

    /// Insert-if-absent-else-replace by id. Returns true if inserted.
    ///
    /// # Invariants
    ///
    /// On replace, the existing message history is preserved unless the
    /// incoming room carries a non-empty history of its own. Callers that
    /// only update metadata must never truncate messages.
    pub fn upsert(&mut self, mut room: Room) -> bool {
        match self.rooms.entry(room.id.clone()) {
            Entry::Occupied(mut occupied) => {
                if room.messages.is_empty() {
                    room.messages = std::mem::take(&mut occupied.get_mut().messages);
                }
                occupied.insert(room);
                false
            },
            Entry::Vacant(vacant) => {
                vacant.insert(room);
                true
            },
        }
    }

    /// Connection established: (re)build the full subscription set.
    ///
    /// Each joined room maps to exactly one room-scoped subscription; the
    /// directory channel is always subscribed.
    fn handle_connected(&mut self) -> Vec<ClientAction> {
        self.connected = true;

        let mut actions = vec![ClientAction::Subscribe { topic: self.topics.directory() }];
        for room in self.rooms_by_recency() {
            actions.push(ClientAction::Subscribe { topic: self.topics.room(&room.id) });
        }
        actions.push(ClientAction::Log {
            message: format!("connected, subscribed to {} room(s)", self.rooms.len()),
        });
        actions
    }

    fn handle_disconnected(&mut self) -> Vec<ClientAction> {
        self.connected = false;
        vec![ClientAction::Log { message: "disconnected, outbound publishes paused".to_string() }]
    }

    /// Announce every locally held public room on the directory channel.
    ///
    /// Skipped entirely while disconnected: there is no outbound queue, and
    /// the next cycle after reconnect re-announces everything anyway.
    fn handle_announce_tick(&mut self) -> Vec<ClientAction> {
        if !self.connected {
            return vec![];
        }

        self.rooms
            .values()
            .filter(|room| room.is_public)
            .filter_map(|room| self.announce(room))
            .collect()
    }

    /// Build the announcement publish for one public room.
    ///
    /// Encoding these fixed shapes cannot realistically fail; if it ever
    /// does, the announcement is skipped and retried on the next cycle.
    fn announce(&self, room: &Room) -> Option<ClientAction> {
        let announcement =
            Announcement { id: room.id.clone(), name: room.name.clone() };
        let payload = announcement.encode().ok()?;
        Some(ClientAction::Publish { topic: self.topics.directory(), payload })
    }

    fn handle_create_room(
        &mut self,
        name: &str,
        is_public: bool,
    ) -> Result<Vec<ClientAction>, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyRoomName);
        }

        let room = Room::new(Room::generate_id(&self.env), name, is_public, self.env.now_millis());
        let room_id = room.id.clone();

        let mut actions = vec![ClientAction::Subscribe { topic: self.topics.room(&room_id) }];

        // Freshly generated id cannot collide with an existing local room,
        // so this is always an insert.
        self.upsert(room.clone());
        actions.push(self.persist());

        if is_public && self.connected {
            // One immediate announcement so peers see the room before the
            // next periodic cycle.
            if let Some(publish) = self.announce(&room) {
                actions.push(publish);
            }
        }

        actions.push(ClientAction::RoomJoined { room_id });
        Ok(actions)
    }

    fn handle_join_by_id(&mut self, room_id: &str) -> Result<Vec<ClientAction>, ClientError> {
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(ClientError::EmptyRoomId);
        }

        // Optimistic join: no existence check, silently inert if nothing is
        // ever published to this channel.
        let room = Room::joined_by_id(room_id.to_string(), self.env.now_millis());
        let inserted = self.upsert(room);

        let mut actions = Vec::new();
        if inserted {
            actions.push(ClientAction::Subscribe { topic: self.topics.room(room_id) });
        }
        actions.push(self.persist());
        actions.push(ClientAction::RoomJoined { room_id: room_id.to_string() });
        Ok(actions)
    }

    /// Join a room from its directory entry. Idempotent: joining an
    /// already-joined room changes nothing but still navigates to it.
    fn handle_join_from_directory(&mut self, entry: DirectoryEntry) -> Vec<ClientAction> {
        if self.rooms.contains_key(&entry.id) {
            return vec![ClientAction::RoomJoined { room_id: entry.id }];
        }

        let room = Room::from_directory(&entry, self.env.now_millis());
        let room_id = room.id.clone();
        self.upsert(room);

        vec![
            ClientAction::Subscribe { topic: self.topics.room(&room_id) },
            self.persist(),
            ClientAction::RoomJoined { room_id },
        ]
    }

    fn handle_send_message(
        &mut self,
        room_id: &str,
        content: String,
        kind: MessageKind,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if kind == MessageKind::Text && content.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let now = self.env.now_millis();
        let Some(room) = self.rooms.get_mut(room_id) else {
            return Err(ClientError::RoomNotFound { room_id: room_id.to_string() });
        };

        let message = ChatMessage {
            sender_id: self.identity.id.clone(),
            sender_name: self.identity.display_name.clone(),
            content,
            kind,
        };

        // Optimistic local echo: the sender sees its own message
        // immediately; the copy echoed back by the bus is discarded on
        // ingest.
        room.append(message.clone(), now);

        let mut actions = vec![
            ClientAction::MessageAppended { room_id: room_id.to_string(), message: message.clone() },
            self.persist(),
        ];

        if self.connected {
            match message.to_wire().encode() {
                Ok(payload) => {
                    actions.push(ClientAction::Publish { topic: self.topics.room(room_id), payload });
                },
                Err(e) => actions.push(ClientAction::Log {
                    message: format!("encode failed, message kept local-only: {e}"),
                }),
            }
        }
        // Disconnected: message is persisted locally but never delivered to
        // peers. No retry queue by design.

        Ok(actions)
    }

    fn handle_clear_all(&mut self) -> Vec<ClientAction> {
        self.rooms.clear();
        vec![
            self.persist(),
            ClientAction::RoomsCleared,
            ClientAction::Log { message: "room history cleared".to_string() },
        ]
    }

    /// Route and apply one inbound bus delivery.
    ///
    /// All failure paths drop the payload and keep the session healthy: one
    /// bad peer message must not disrupt local state.
    fn handle_delivery(&mut self, topic: &str, payload: &[u8]) -> Vec<ClientAction> {
        match self.topics.route(topic) {
            Route::Directory => self.ingest_announcement(payload),
            Route::Room(room_id) => self.ingest_message(&room_id, payload),
            Route::Foreign => {
                vec![ClientAction::Log { message: format!("ignoring foreign topic: {topic}") }]
            },
        }
    }

    /// Merge a directory announcement: last announcement wins, arrival order.
    ///
    /// No authorship check: any device can overwrite any entry by id. A
    /// stale announcement for a joined room only touches the directory map,
    /// never the joined room's state.
    fn ingest_announcement(&mut self, payload: &[u8]) -> Vec<ClientAction> {
        let entry = match Announcement::decode(payload) {
            Ok(announcement) => DirectoryEntry::from(announcement),
            Err(e) => {
                return vec![ClientAction::Log {
                    message: format!("dropping malformed announcement: {e}"),
                }];
            },
        };

        self.directory.insert(entry.id.clone(), entry);
        vec![ClientAction::DirectoryChanged]
    }

    /// Apply an inbound room message to local history.
    fn ingest_message(&mut self, room_id: &str, payload: &[u8]) -> Vec<ClientAction> {
        let wire = match WireMessage::decode(payload) {
            Ok(wire) => wire,
            Err(e) => {
                return vec![ClientAction::Log {
                    message: format!("dropping malformed message on {room_id}: {e}"),
                }];
            },
        };

        // Self-echo suppression: each room has one shared channel, so we
        // receive our own publishes back. The local copy was appended at
        // send time.
        if wire.sender_id == self.identity.id {
            return vec![];
        }

        let now = self.env.now_millis();
        let Some(room) = self.rooms.get_mut(room_id) else {
            // No implicit room creation from inbound traffic: history exists
            // only for rooms this device explicitly joined.
            return vec![ClientAction::Log {
                message: format!("dropping message for unknown room {room_id}"),
            }];
        };

        let message = ChatMessage::from_wire(wire);
        room.append(message.clone(), now);

        vec![
            ClientAction::MessageAppended { room_id: room_id.to_string(), message },
            self.persist(),
        ]
    }

    /// Snapshot the room set for persistence.
    fn persist(&self) -> ClientAction {
        ClientAction::PersistRooms { rooms: self.rooms.values().cloned().collect() }
    }
}
