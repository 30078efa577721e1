//! End-to-end runtime tests: the real application runtime driving the
//! simulated bus, observed from a peer device.

#![allow(clippy::unwrap_used)]

use banter_app::{AppAction, Bridge, Runtime};
use banter_client::ClientEvent;
use banter_core::{
    Identity, Room,
    storage::{MemoryStore, Store},
};
use banter_harness::{Device, SimBus, SimDriver, SimEnv};
use banter_proto::{MessageKind, TopicSpace};

const BASE: &str = "banter_v1";

fn peer_device(bus: &SimBus, env: &SimEnv) -> Device {
    let identity = Identity::generate(env, "peer");
    let client = banter_client::Client::new(
        env.clone(),
        identity,
        TopicSpace::new(BASE),
        Vec::new(),
    );
    let mut device = Device { client, handle: bus.attach(), store: MemoryStore::new() };
    device.dispatch(ClientEvent::Connected).unwrap();
    device
}

#[tokio::test]
async fn runtime_publishes_messages_to_peers() {
    let env = SimEnv::with_seed(21);
    let bus = SimBus::new();
    let mut peer = peer_device(&bus, &env);
    peer.dispatch(ClientEvent::JoinById { room_id: "lobby".to_string() }).unwrap();

    let store = MemoryStore::new();
    let bridge =
        Bridge::open(env.clone(), store.clone(), TopicSpace::new(BASE), "Ada").unwrap();
    let driver = SimDriver::new(bus.attach(), env.clone());
    let runtime = Runtime::new(driver, bridge);

    let intents = runtime.intent_sender();
    intents.send(AppAction::JoinById { room_id: "lobby".to_string() });
    intents.send(AppAction::SendMessage {
        room_id: "lobby".to_string(),
        content: "hello from the runtime".to_string(),
        kind: MessageKind::Text,
    });
    intents.send(AppAction::Quit);

    runtime.run().await.unwrap();

    peer.pump();
    let room = peer.room("lobby").unwrap();
    assert_eq!(room.messages.len(), 1);
    assert_eq!(room.messages[0].content, "hello from the runtime");
    assert_eq!(room.messages[0].sender_name, "Ada");

    // The runtime's store saw the same history (shared-state clone).
    let saved = store.load_rooms().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].messages.len(), 1);
}

#[tokio::test]
async fn runtime_announces_public_rooms_on_startup() {
    let env = SimEnv::with_seed(22);
    let bus = SimBus::new();
    let mut peer = peer_device(&bus, &env);

    // A previous session left a public room in the store.
    let store = MemoryStore::new();
    store
        .save_rooms(&[Room::new("r_pub".to_string(), "Sprint", true, 0)])
        .unwrap();

    let bridge =
        Bridge::open(env.clone(), store, TopicSpace::new(BASE), "Ada").unwrap();
    let driver = SimDriver::new(bus.attach(), env.clone());
    let runtime = Runtime::new(driver, bridge);

    let intents = runtime.intent_sender();
    intents.send(AppAction::Quit);
    runtime.run().await.unwrap();

    // The first announce cycle fired before shutdown; the peer learned of
    // the room.
    peer.pump();
    let entry = peer.client.directory_entry("r_pub").unwrap();
    assert_eq!(entry.name, "Sprint");
}
