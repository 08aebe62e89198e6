//! Last-session-id persistence for reload continuity.
//!
//! After every successful chat turn the current session id is persisted so
//! a restarted client can ask the backend for that session's snapshot and
//! restore the encounter.

use serde::{Deserialize, Serialize};

use super::StorageError;
use super::json_file::AtomicJsonFile;
use crate::paths::SmartDocPaths;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredSession {
    session_id: String,
}

/// Storage for the persisted-session file (session.json).
pub struct SessionStorage {
    file: AtomicJsonFile<StoredSession>,
}

impl SessionStorage {
    /// Creates storage at the default path (`~/.config/smartdoc/session.json`).
    pub fn new() -> Result<Self, StorageError> {
        let path = SmartDocPaths::session_file()?;
        Ok(Self {
            file: AtomicJsonFile::new(path),
        })
    }

    /// Creates storage at a custom path (for testing).
    pub fn with_path(path: std::path::PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// The session id recorded by the previous run, if any.
    pub fn load_session_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self.file.load()?.map(|stored| stored.session_id))
    }

    /// Records the current session id.
    pub fn save_session_id(&self, session_id: &str) -> Result<(), StorageError> {
        self.file.save(&StoredSession {
            session_id: session_id.to_string(),
        })
    }

    /// Forgets the recorded session (explicit new-session request).
    pub fn clear(&self) -> Result<(), StorageError> {
        self.file.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_id_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::with_path(temp_dir.path().join("session.json"));

        assert_eq!(storage.load_session_id().unwrap(), None);
        storage.save_session_id("SESS_AB12CD34E").unwrap();
        assert_eq!(
            storage.load_session_id().unwrap(),
            Some("SESS_AB12CD34E".to_string())
        );
        storage.clear().unwrap();
        assert_eq!(storage.load_session_id().unwrap(), None);
    }
}
