//! Persisted client-side state.
//!
//! The bearer token, the last session id, and the endpoint overrides live
//! in small files under the user config directory, written atomically
//! (tmp file + rename).

mod config_storage;
mod credential_storage;
mod json_file;
mod session_storage;

pub use config_storage::{ClientConfig, ConfigStorage};
pub use credential_storage::{CredentialStorage, StoredCredentials};
pub use json_file::AtomicJsonFile;
pub use session_storage::SessionStorage;

use crate::paths::PathError;
use smartdoc_core::SmartDocError;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing/serialization error.
    JsonError(serde_json::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageError::JsonError(e) => write!(f, "JSON error: {}", e),
            StorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            StorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            StorageError::ConfigDirNotFound => write!(f, "Could not determine config directory"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::JsonError(e)
    }
}

impl From<toml::de::Error> for StorageError {
    fn from(e: toml::de::Error) -> Self {
        StorageError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(e: toml::ser::Error) -> Self {
        StorageError::TomlSerError(e)
    }
}

impl From<PathError> for StorageError {
    fn from(_: PathError) -> Self {
        StorageError::ConfigDirNotFound
    }
}

impl From<StorageError> for SmartDocError {
    fn from(e: StorageError) -> Self {
        SmartDocError::storage(e.to_string())
    }
}
