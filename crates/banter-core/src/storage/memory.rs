//! In-memory storage for tests and simulation.

use std::sync::{Arc, Mutex, PoisonError};

use super::{Store, StorageError};
use crate::model::{Identity, Room};

#[derive(Default)]
struct MemoryState {
    identity: Option<Identity>,
    rooms: Vec<Room>,
}

/// In-memory [`Store`] implementation.
///
/// Clones share state via `Arc`, mirroring how durable implementations share
/// one underlying database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Store for MemoryStore {
    fn load_identity(&self) -> Result<Option<Identity>, StorageError> {
        Ok(self.with_state(|s| s.identity.clone()))
    }

    fn save_identity(&self, identity: &Identity) -> Result<(), StorageError> {
        self.with_state(|s| s.identity = Some(identity.clone()));
        Ok(())
    }

    fn load_rooms(&self) -> Result<Vec<Room>, StorageError> {
        Ok(self.with_state(|s| s.rooms.clone()))
    }

    fn save_rooms(&self, rooms: &[Room]) -> Result<(), StorageError> {
        self.with_state(|s| s.rooms = rooms.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.identity = None;
            s.rooms.clear();
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::env::{Environment as _, test_utils::MockEnv};

    #[test]
    fn starts_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.load_identity().unwrap(), None);
        assert!(store.load_rooms().unwrap().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let env = MockEnv::new();
        let store = MemoryStore::new();
        let clone = store.clone();

        let room = Room::new(env.token(8), "Sprint", true, env.now_millis());
        store.save_rooms(std::slice::from_ref(&room)).unwrap();

        assert_eq!(clone.load_rooms().unwrap(), vec![room]);
    }

    #[test]
    fn clear_wipes_everything() {
        let store = MemoryStore::new();
        store.save_identity(&Identity::generate(&MockEnv::new(), "Ada")).unwrap();
        store.save_rooms(&[Room::new("r1".to_string(), "Sprint", false, 0)]).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load_identity().unwrap(), None);
        assert!(store.load_rooms().unwrap().is_empty());
    }
}
