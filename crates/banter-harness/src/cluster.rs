//! Multi-device test cluster.
//!
//! Wires several simulated devices through one [`SimBus`] and executes
//! client actions the way the production runtime would: subscribes and
//! publishes go to the bus, persistence goes to an in-memory store, and
//! queued deliveries are pumped back into the clients.

use banter_client::{
    Client, ClientAction, ClientError, ClientEvent,
    transport::BusTransport,
};
use banter_core::{
    DirectoryEntry, Identity, Room, RoomId,
    storage::{MemoryStore, Store},
};
use banter_proto::{MessageKind, TopicSpace};

use crate::{BusHandle, SimBus, SimEnv};

/// Base topic used by every simulated deployment.
const SIM_BASE: &str = "banter_sim";

/// One simulated device: a client, its bus connection, and its store.
pub struct Device {
    /// The device's sync client.
    pub client: Client<SimEnv>,
    /// The device's bus connection.
    pub handle: BusHandle,
    /// The device's local store.
    pub store: MemoryStore,
}

impl Device {
    /// Feed an event to the client and execute the resulting actions:
    /// subscribes and publishes against the bus, persistence against the
    /// store. Returns the actions for inspection.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn dispatch(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        let actions = self.client.handle(event)?;

        for action in &actions {
            match action {
                ClientAction::Subscribe { topic } => {
                    if let Err(e) = self.handle.subscribe(topic) {
                        tracing::warn!(topic, error = %e, "subscribe dropped");
                    }
                },
                ClientAction::Publish { topic, payload } => {
                    // Fire-and-forget, matching production semantics.
                    if let Err(e) = self.handle.publish(topic, payload) {
                        tracing::warn!(topic, error = %e, "publish dropped");
                    }
                },
                ClientAction::PersistRooms { rooms } => {
                    if let Err(e) = self.store.save_rooms(rooms) {
                        tracing::error!(error = %e, "persist failed");
                    }
                },
                ClientAction::MessageAppended { .. }
                | ClientAction::RoomJoined { .. }
                | ClientAction::DirectoryChanged
                | ClientAction::RoomsCleared
                | ClientAction::Log { .. } => {},
            }
        }

        Ok(actions)
    }

    /// Deliver everything queued on the bus for this device.
    ///
    /// Returns how many deliveries were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        // Deliveries can trigger publishes that queue more deliveries for
        // this same device; drain until quiescent.
        loop {
            let pending = self.handle.drain();
            if pending.is_empty() {
                return processed;
            }
            for (topic, payload) in pending {
                processed += 1;
                let _ = self.dispatch(ClientEvent::Delivery { topic, payload });
            }
        }
    }

    /// The device's identity.
    pub fn identity(&self) -> &Identity {
        self.client.identity()
    }

    /// Look up a joined room on this device.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.client.room(room_id)
    }
}

/// Simulated cluster of devices sharing one bus.
pub struct TestCluster {
    /// Shared environment (one RNG stream, one virtual clock).
    pub env: SimEnv,
    /// The devices, in attach order.
    pub devices: Vec<Device>,
}

impl TestCluster {
    /// Create a cluster with the given number of devices, all connected.
    pub fn new(seed: u64, num_devices: usize) -> Self {
        let env = SimEnv::with_seed(seed);
        let bus = SimBus::new();
        let topics = TopicSpace::new(SIM_BASE);

        let mut devices: Vec<Device> = (0..num_devices)
            .map(|i| {
                let identity = Identity::generate(&env, format!("device-{i}"));
                let client =
                    Client::new(env.clone(), identity, topics.clone(), Vec::new());
                Device { client, handle: bus.attach(), store: MemoryStore::new() }
            })
            .collect();

        for device in &mut devices {
            let _ = device.dispatch(ClientEvent::Connected);
        }

        Self { env, devices }
    }

    /// Create a room on the given device, returning the generated id.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn create_room(
        &mut self,
        idx: usize,
        name: &str,
        is_public: bool,
    ) -> Result<RoomId, ClientError> {
        let actions = self.devices[idx].dispatch(ClientEvent::CreateRoom {
            name: name.to_string(),
            is_public,
        })?;
        Ok(actions
            .into_iter()
            .find_map(|a| match a {
                ClientAction::RoomJoined { room_id } => Some(room_id),
                _ => None,
            })
            .unwrap_or_default())
    }

    /// Join a room by id on the given device.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn join_by_id(&mut self, idx: usize, room_id: &str) -> Result<(), ClientError> {
        self.devices[idx]
            .dispatch(ClientEvent::JoinById { room_id: room_id.to_string() })?;
        Ok(())
    }

    /// Join a room from a directory entry on the given device.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn join_from_directory(
        &mut self,
        idx: usize,
        entry: DirectoryEntry,
    ) -> Result<(), ClientError> {
        self.devices[idx].dispatch(ClientEvent::JoinFromDirectory { entry })?;
        Ok(())
    }

    /// Send a text message from the given device.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn send_text(
        &mut self,
        idx: usize,
        room_id: &str,
        content: &str,
    ) -> Result<(), ClientError> {
        self.devices[idx].dispatch(ClientEvent::SendMessage {
            room_id: room_id.to_string(),
            content: content.to_string(),
            kind: MessageKind::Text,
        })?;
        Ok(())
    }

    /// Fire the announce timer on the given device.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the client.
    pub fn announce(&mut self, idx: usize) -> Result<(), ClientError> {
        self.devices[idx].dispatch(ClientEvent::AnnounceTick)?;
        Ok(())
    }

    /// Take a device's bus link down.
    pub fn disconnect(&mut self, idx: usize) {
        self.devices[idx].handle.set_connected(false);
        let _ = self.devices[idx].dispatch(ClientEvent::Disconnected);
    }

    /// Bring a device's bus link back up; the client replays its
    /// subscription set.
    pub fn reconnect(&mut self, idx: usize) {
        self.devices[idx].handle.set_connected(true);
        let _ = self.devices[idx].dispatch(ClientEvent::Connected);
    }

    /// Deliver all queued bus traffic on every device until quiescent.
    ///
    /// Returns the total number of deliveries processed.
    pub fn pump(&mut self) -> usize {
        let mut total = 0;
        loop {
            let processed: usize =
                self.devices.iter_mut().map(Device::pump).sum();
            if processed == 0 {
                return total;
            }
            total += processed;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn devices_get_distinct_identities() {
        let cluster = TestCluster::new(0, 3);
        let ids: Vec<&str> =
            cluster.devices.iter().map(|d| d.identity().id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn pump_settles_to_quiescence() {
        let mut cluster = TestCluster::new(0, 2);
        let room_id = cluster.create_room(0, "Sprint", false).unwrap();
        cluster.join_by_id(1, &room_id).unwrap();
        cluster.send_text(0, &room_id, "hello").unwrap();

        assert!(cluster.pump() > 0);
        assert_eq!(cluster.pump(), 0);
    }

    #[test]
    fn persisted_state_mirrors_client_state() {
        let mut cluster = TestCluster::new(0, 1);
        let room_id = cluster.create_room(0, "Sprint", false).unwrap();

        let saved = cluster.devices[0].store.load_rooms().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, room_id);
    }
}
