//! Property tests for the synchronization rules.
//!
//! These drive the client with generated event sequences and check the
//! invariants that keep serverless sync coherent: set semantics on the room
//! set, history preservation, self-echo suppression, and last-writer-wins
//! directory merges.

#![allow(clippy::unwrap_used)]

use banter_client::{Client, ClientAction, ClientEvent, DirectoryEntry, Identity};
use banter_core::env::test_utils::MockEnv;
use banter_proto::{Announcement, MessageKind, TopicSpace, WireMessage};
use proptest::prelude::*;

const BASE: &str = "banter_v1";

fn client(seed: u64) -> Client<MockEnv> {
    let identity = Identity { id: "u_local".to_string(), display_name: "Ada".to_string() };
    Client::new(MockEnv::with_seed(seed), identity, TopicSpace::new(BASE), Vec::new())
}

fn wire(sender: &str, txt: &str) -> Vec<u8> {
    WireMessage {
        sender_id: sender.to_string(),
        sender_name: "Peer".to_string(),
        txt: txt.to_string(),
        kind: MessageKind::Text,
    }
    .encode()
    .unwrap()
}

fn room_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

proptest! {
    /// Joining the same directory entry any number of times leaves exactly
    /// one room with its history intact.
    #[test]
    fn repeated_directory_joins_are_idempotent(
        id in room_id_strategy(),
        name in "[A-Za-z ]{1,16}",
        joins in 1usize..6,
        messages in prop::collection::vec("[a-z]{1,10}", 0..5),
    ) {
        let mut client = client(0);
        let entry = DirectoryEntry { id: id.clone(), name };

        client.handle(ClientEvent::JoinFromDirectory { entry: entry.clone() }).unwrap();
        for txt in &messages {
            client
                .handle(ClientEvent::Delivery {
                    topic: format!("{BASE}/room/{id}"),
                    payload: wire("u_peer", txt),
                })
                .unwrap();
        }

        for _ in 0..joins {
            client.handle(ClientEvent::JoinFromDirectory { entry: entry.clone() }).unwrap();
        }

        prop_assert_eq!(client.room_count(), 1);
        prop_assert_eq!(client.room(&id).unwrap().messages.len(), messages.len());
    }

    /// Rejoining a room by id never truncates accumulated history, no
    /// matter how much of it there is.
    #[test]
    fn rejoin_by_id_never_loses_history(
        id in room_id_strategy(),
        messages in prop::collection::vec("[a-z]{1,10}", 0..10),
    ) {
        let mut client = client(1);
        client.handle(ClientEvent::JoinById { room_id: id.clone() }).unwrap();
        for txt in &messages {
            client
                .handle(ClientEvent::Delivery {
                    topic: format!("{BASE}/room/{id}"),
                    payload: wire("u_peer", txt),
                })
                .unwrap();
        }

        client.handle(ClientEvent::JoinById { room_id: id.clone() }).unwrap();

        let room = client.room(&id).unwrap();
        prop_assert_eq!(room.messages.len(), messages.len());
        for (msg, txt) in room.messages.iter().zip(&messages) {
            prop_assert_eq!(&msg.content, txt);
        }
    }

    /// Echoes of our own publishes never append: sending then receiving the
    /// echo leaves exactly one copy per message.
    #[test]
    fn self_echoes_never_duplicate(
        contents in prop::collection::vec("[a-z]{1,10}", 1..8),
    ) {
        let mut client = client(2);
        client.handle(ClientEvent::Connected).unwrap();
        client.handle(ClientEvent::JoinById { room_id: "r1".to_string() }).unwrap();

        for content in &contents {
            let actions = client
                .handle(ClientEvent::SendMessage {
                    room_id: "r1".to_string(),
                    content: content.clone(),
                    kind: MessageKind::Text,
                })
                .unwrap();

            // Feed every publish straight back, as a shared channel would.
            let echoes: Vec<Vec<u8>> = actions
                .iter()
                .filter_map(|a| match a {
                    ClientAction::Publish { payload, .. } => Some(payload.clone()),
                    _ => None,
                })
                .collect();
            for payload in echoes {
                client
                    .handle(ClientEvent::Delivery {
                        topic: format!("{BASE}/room/r1"),
                        payload,
                    })
                    .unwrap();
            }
        }

        prop_assert_eq!(client.room("r1").unwrap().messages.len(), contents.len());
    }

    /// The directory converges on the last announcement per id, in arrival
    /// order, regardless of the sequence.
    #[test]
    fn directory_merge_is_last_writer_wins(
        announcements in prop::collection::vec(
            (room_id_strategy(), "[A-Za-z]{1,12}"),
            1..20,
        ),
    ) {
        let mut client = client(3);
        for (id, name) in &announcements {
            let payload =
                Announcement { id: id.clone(), name: name.clone() }.encode().unwrap();
            client
                .handle(ClientEvent::Delivery { topic: format!("{BASE}/pub"), payload })
                .unwrap();
        }

        for (id, name) in &announcements {
            // The winner for each id is its final occurrence.
            let expected = announcements
                .iter()
                .rev()
                .find(|(other, _)| other == id)
                .map(|(_, n)| n.clone())
                .unwrap_or_else(|| name.clone());
            prop_assert_eq!(client.directory_entry(id).map(|e| e.name.clone()), Some(expected));
        }
    }

    /// Inbound traffic never creates rooms: only explicit joins grow the
    /// room set.
    #[test]
    fn deliveries_never_create_rooms(
        deliveries in prop::collection::vec(
            (room_id_strategy(), "[a-z]{1,10}"),
            0..15,
        ),
    ) {
        let mut client = client(4);
        for (id, txt) in &deliveries {
            client
                .handle(ClientEvent::Delivery {
                    topic: format!("{BASE}/room/{id}"),
                    payload: wire("u_peer", txt),
                })
                .unwrap();
        }
        prop_assert_eq!(client.room_count(), 0);
    }

    /// Arbitrary garbage on any topic never panics and never mutates the
    /// room set.
    #[test]
    fn garbage_payloads_are_harmless(
        topic in "[a-z0-9/_]{0,30}",
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut client = client(5);
        client.handle(ClientEvent::JoinById { room_id: "r1".to_string() }).unwrap();

        client.handle(ClientEvent::Delivery { topic, payload }).unwrap();

        prop_assert_eq!(client.room_count(), 1);
        prop_assert!(client.room("r1").unwrap().messages.is_empty());
    }

    /// Created rooms always get distinct 8-char base36 ids within a session.
    #[test]
    fn created_room_ids_are_wellformed_and_distinct(count in 1usize..10) {
        let mut client = client(6);
        for i in 0..count {
            client
                .handle(ClientEvent::CreateRoom { name: format!("Room {i}"), is_public: false })
                .unwrap();
        }

        prop_assert_eq!(client.room_count(), count);
        for room in client.rooms_by_recency() {
            prop_assert_eq!(room.id.len(), 8);
            prop_assert!(room.id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
