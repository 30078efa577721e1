//! Storage abstraction for local device state.
//!
//! The store is a durable key-value surface with two logical keys: the
//! identity record and the room set. The trait is synchronous; persistence is
//! a side effect completed before an event handler returns, so a crash after
//! mutation but before persist cannot go undetected.
//!
//! # Failure semantics
//!
//! Save failures are surfaced to the calling operation (log and report, never
//! swallow). Load failures at startup fall back to empty/default state and
//! never crash the session.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::model::{Identity, Room};

/// Durable key-value persistence for identity and the room set.
///
/// # Clone semantics
///
/// Implementations share internal state via `Arc`: clones access the same
/// underlying storage, so one instance can serve multiple components.
pub trait Store: Clone + Send + Sync + 'static {
    /// Load the identity record. `Ok(None)` if no login has happened yet.
    fn load_identity(&self) -> Result<Option<Identity>, StorageError>;

    /// Persist the identity record, overwriting any previous value.
    fn save_identity(&self, identity: &Identity) -> Result<(), StorageError>;

    /// Load the room set. Absent state loads as an empty set.
    fn load_rooms(&self) -> Result<Vec<Room>, StorageError>;

    /// Persist the entire room set, overwriting any previous value.
    ///
    /// The room set is always written wholesale: it is small, and partial
    /// writes would let in-memory and persisted state diverge silently.
    fn save_rooms(&self, rooms: &[Room]) -> Result<(), StorageError>;

    /// Wipe all persisted state (identity and rooms). Irreversible.
    fn clear(&self) -> Result<(), StorageError>;
}
