//! JSON-file storage.
//!
//! One JSON document per logical key under a state directory, the same
//! key-per-document layout the original client used with its browser-local
//! store. Writes go through a temp file + rename so a crash mid-write leaves
//! the previous document intact.

use std::{fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use super::{Store, StorageError};
use crate::model::{Identity, Room};

const IDENTITY_FILE: &str = "identity.json";
const ROOMS_FILE: &str = "rooms.json";

/// File-backed [`Store`] implementation.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StorageError> {
        match fs::read(self.path(file)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        let tmp = self.path(&format!("{file}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.path(file))?;
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(file)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Store for FileStore {
    fn load_identity(&self) -> Result<Option<Identity>, StorageError> {
        self.read_json(IDENTITY_FILE)
    }

    fn save_identity(&self, identity: &Identity) -> Result<(), StorageError> {
        self.write_json(IDENTITY_FILE, identity)
    }

    fn load_rooms(&self) -> Result<Vec<Room>, StorageError> {
        Ok(self.read_json(ROOMS_FILE)?.unwrap_or_default())
    }

    fn save_rooms(&self, rooms: &[Room]) -> Result<(), StorageError> {
        self.write_json(ROOMS_FILE, &rooms)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.remove(IDENTITY_FILE)?;
        self.remove(ROOMS_FILE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::env::test_utils::MockEnv;

    #[test]
    fn missing_files_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.load_identity().unwrap(), None);
        assert!(store.load_rooms().unwrap().is_empty());
    }

    #[test]
    fn identity_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let identity = Identity::generate(&MockEnv::new(), "Ada");
        store.save_identity(&identity).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load_identity().unwrap(), Some(identity));
    }

    #[test]
    fn rooms_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let rooms = vec![
            Room::new("r1".to_string(), "Sprint", true, 10),
            Room::new("r2".to_string(), "Standup", false, 20),
        ];
        store.save_rooms(&rooms).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load_rooms().unwrap(), rooms);
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join(ROOMS_FILE), b"{broken").unwrap();

        assert!(matches!(store.load_rooms(), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn clear_removes_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.save_rooms(&[Room::new("r1".to_string(), "Sprint", true, 0)]).unwrap();

        store.clear().unwrap();
        assert!(store.load_rooms().unwrap().is_empty());
        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }
}
