//! Core types for Banter.
//!
//! This crate holds everything the synchronization state machine depends on
//! that is not wire protocol: the persisted data model ([`Identity`],
//! [`Room`], [`ChatMessage`], [`DirectoryEntry`]), the [`env::Environment`]
//! abstraction over time and randomness, and the [`storage::Store`]
//! abstraction over the device's durable key-value state.
//!
//! Nothing here performs I/O besides the storage implementations; protocol
//! logic lives in `banter-client`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
mod model;
pub mod storage;

pub use model::{ChatMessage, DirectoryEntry, Identity, Room, RoomId};
