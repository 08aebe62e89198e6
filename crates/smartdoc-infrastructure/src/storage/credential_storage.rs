//! Bearer-token persistence.
//!
//! The token obtained from `/auth/login` is kept across runs and attached
//! by the gateway until logout clears it.

use serde::{Deserialize, Serialize};

use super::StorageError;
use super::json_file::AtomicJsonFile;
use crate::paths::SmartDocPaths;

/// Persisted authentication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
}

/// Storage for the credentials file (credentials.json).
///
/// Responsibilities:
/// - Load/save the bearer token under the user config directory
/// - Clear it on logout
///
/// Does NOT validate the token; an expired token simply fails at the
/// gateway with an HTTP error.
pub struct CredentialStorage {
    file: AtomicJsonFile<StoredCredentials>,
}

impl CredentialStorage {
    /// Creates storage at the default path
    /// (`~/.config/smartdoc/credentials.json`).
    pub fn new() -> Result<Self, StorageError> {
        let path = SmartDocPaths::credentials_file()?;
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

    /// Loads the persisted token, if any.
    pub fn load_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.file.load()?.map(|credentials| credentials.token))
    }

    /// Persists a freshly obtained token.
    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        tracing::debug!("[STORAGE] Persisting bearer token");
        self.file.save(&StoredCredentials {
            token: token.to_string(),
        })
    }

    /// Removes the persisted token.
    pub fn clear(&self) -> Result<(), StorageError> {
        tracing::debug!("[STORAGE] Clearing bearer token");
        self.file.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = CredentialStorage::with_path(temp_dir.path().join("credentials.json"));
        assert_eq!(storage.load_token().unwrap(), None);
    }

    #[test]
    fn test_save_load_clear_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let storage = CredentialStorage::with_path(temp_dir.path().join("credentials.json"));

        storage.save_token("tok_123").unwrap();
        assert_eq!(storage.load_token().unwrap(), Some("tok_123".to_string()));

        storage.clear().unwrap();
        assert_eq!(storage.load_token().unwrap(), None);
    }
}
