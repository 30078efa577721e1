//! Client
//!
//! Action-based synchronization state machine for Banter. Manages the public
//! room directory, room memberships, and message synchronization against the
//! shared pub/sub bus.
//!
//! # Architecture
//!
//! The client is Sans-IO: it receives events ([`ClientEvent`]), processes
//! them through pure state machine logic, and returns actions
//! ([`ClientAction`]) for the caller to execute (subscribe, publish,
//! persist, deliver to the UI). There is no central authority behind the
//! bus, so correctness rests on local rules: de-duplication by self-echo
//! suppression, drop-on-unknown-room, last-writer-wins directory merge, and
//! history preservation on upsert.
//!
//! # Components
//!
//! - [`Client`]: session context owning identity, room set, and directory
//! - [`ClientEvent`] / [`ClientAction`]: the event/action surface
//! - [`transport::BusTransport`]: the Transport Adapter interface the
//!   runtime implements against whatever bus client is available

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod event;
pub mod transport;

pub use banter_core::{ChatMessage, DirectoryEntry, Identity, Room, RoomId, env::Environment};
pub use client::Client;
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent};
