//! Sync-to-application translation layer.
//!
//! The [`Bridge`] wraps the low-level [`banter_client::Client`] and adapts
//! it to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] intents into client events.
//! - Executes persistence actions against the owned [`Store`] synchronously,
//!   so a triggering operation is complete only once its snapshot is saved.
//! - Accumulates outgoing subscribes and publishes for the driver to flush
//!   in the next I/O cycle.
//! - Interprets client actions and converts them back into
//!   [`crate::AppEvent`]s to update the UI.

use banter_client::{Client, ClientAction, ClientError, ClientEvent};
use banter_core::{
    Identity, env::Environment, storage::{Store, StorageError},
};
use banter_proto::TopicSpace;

use crate::{AppAction, AppEvent};

/// Bridge between App intents and client sync logic.
///
/// Generic over Environment and Store to support both production and
/// simulation.
pub struct Bridge<E: Environment, S: Store> {
    client: Client<E>,
    store: S,
    subscribes: Vec<String>,
    publishes: Vec<(String, Vec<u8>)>,
}

impl<E: Environment, S: Store> Bridge<E, S> {
    /// Open a bridge: load or create the identity, load the room set, and
    /// construct the client.
    ///
    /// A corrupt or unreadable room snapshot degrades to an empty room set
    /// with a warning; identity load/save failures abort startup since
    /// without a stable id every message would appear to come from a
    /// stranger.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the identity cannot be loaded or saved.
    pub fn open(
        env: E,
        store: S,
        topics: TopicSpace,
        display_name: &str,
    ) -> Result<Self, StorageError> {
        let identity = match store.load_identity()? {
            Some(identity) => identity,
            None => {
                let identity = Identity::generate(&env, display_name);
                store.save_identity(&identity)?;
                tracing::info!(id = %identity.id, "created new identity");
                identity
            },
        };

        let rooms = match store.load_rooms() {
            Ok(rooms) => rooms,
            Err(e) => {
                tracing::warn!(error = %e, "room snapshot unreadable, starting empty");
                Vec::new()
            },
        };

        let client = Client::new(env, identity, topics, rooms);
        Ok(Self { client, store, subscribes: Vec::new(), publishes: Vec::new() })
    }

    /// Local identity.
    pub fn identity(&self) -> &Identity {
        self.client.identity()
    }

    /// The underlying client, for inspection.
    pub fn client(&self) -> &Client<E> {
        &self.client
    }

    /// Process an App intent and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let event = match action {
            AppAction::CreateRoom { name, is_public } => {
                ClientEvent::CreateRoom { name, is_public }
            },
            AppAction::JoinById { room_id } => ClientEvent::JoinById { room_id },
            AppAction::JoinFromDirectory { entry } => ClientEvent::JoinFromDirectory { entry },
            AppAction::SendMessage { room_id, content, kind } => {
                ClientEvent::SendMessage { room_id, content, kind }
            },
            AppAction::ClearAll => ClientEvent::ClearAll,
            AppAction::Render | AppAction::Quit => return vec![],
        };

        let result = self.client.handle(event);
        self.handle_client_result(result)
    }

    /// Forward a raw bus delivery to the client.
    pub fn handle_delivery(&mut self, topic: String, payload: Vec<u8>) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Delivery { topic, payload });
        self.handle_client_result(result)
    }

    /// The bus connection came up: rebuild subscriptions.
    pub fn handle_connected(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Connected);
        let mut events = self.handle_client_result(result);
        events.push(AppEvent::Connected);
        events
    }

    /// The bus connection went down.
    pub fn handle_disconnected(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Disconnected);
        let mut events = self.handle_client_result(result);
        events.push(AppEvent::Disconnected);
        events
    }

    /// The periodic announce timer fired.
    pub fn handle_announce_tick(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::AnnounceTick);
        self.handle_client_result(result)
    }

    /// Take pending topic subscriptions.
    pub fn take_subscribes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.subscribes)
    }

    /// Take pending outgoing publishes as (topic, payload) pairs.
    pub fn take_publishes(&mut self) -> Vec<(String, Vec<u8>)> {
        std::mem::take(&mut self.publishes)
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(e) => vec![AppEvent::Error { message: e.to_string() }],
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::Subscribe { topic } => {
                    self.subscribes.push(topic);
                },
                ClientAction::Publish { topic, payload } => {
                    self.publishes.push((topic, payload));
                },
                ClientAction::PersistRooms { rooms } => {
                    if let Err(e) = self.store.save_rooms(&rooms) {
                        tracing::error!(error = %e, "failed to persist rooms");
                        events.push(AppEvent::Error { message: format!("save failed: {e}") });
                    }
                },
                ClientAction::MessageAppended { room_id, message } => {
                    // The client bumped last_activity during the append;
                    // read it back so the view orders identically.
                    let at_millis = self
                        .client
                        .room(&room_id)
                        .map_or(0, |room| room.last_activity);
                    events.push(AppEvent::MessageReceived { room_id, message, at_millis });
                },
                ClientAction::RoomJoined { room_id } => {
                    if let Some(room) = self.client.room(&room_id) {
                        events.push(AppEvent::RoomJoined { room: room.clone() });
                    }
                },
                ClientAction::DirectoryChanged => {
                    events.push(AppEvent::DirectoryUpdated {
                        entries: self.client.directory_entries(),
                    });
                },
                ClientAction::RoomsCleared => {
                    events.push(AppEvent::RoomsCleared);
                },
                ClientAction::Log { message } => {
                    tracing::debug!("{message}");
                },
            }
        }

        events
    }
}
