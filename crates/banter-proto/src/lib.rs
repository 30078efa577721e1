//! Wire protocol for the Banter bus.
//!
//! Everything crossing the pub/sub bus is UTF-8 JSON with fixed field names
//! and no versioning. Two payload shapes exist: directory announcements
//! (`{id, name}`) on the shared directory topic, and room messages
//! (`{from, name, txt, type}`) on per-room topics.
//!
//! Inbound traffic is routed purely by topic shape: the directory topic ends
//! in the `pub` suffix, room topics carry the room id as their final path
//! segment. See [`TopicSpace`].
//!
//! # Invariants
//!
//! - Encoding a payload and decoding it again MUST produce an equal value.
//! - Decoding never panics: malformed payloads surface as
//!   [`ProtocolError::Malformed`] so one bad peer message cannot take down a
//!   session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod topic;
mod wire;

pub use errors::ProtocolError;
pub use topic::{Route, TopicSpace};
pub use wire::{Announcement, MessageKind, WireMessage};
