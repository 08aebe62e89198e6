//! Unified path management for SmartDoc client files.
//!
//! All persisted client-side state (config overrides, credentials, the last
//! session id) lives under the platform config directory, e.g.
//! `~/.config/smartdoc/` on Linux.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find user config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for the SmartDoc client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/smartdoc/          # Config directory
/// ├── config.toml              # Endpoint/gateway overrides
/// ├── credentials.json         # Bearer token
/// └── session.json             # Last session id (reload continuity)
/// ```
pub struct SmartDocPaths;

impl SmartDocPaths {
    /// Returns the SmartDoc configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/smartdoc/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("smartdoc"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the credentials file.
    ///
    /// # Security Note
    ///
    /// The token is stored as plaintext JSON; the file should carry
    /// restrictive permissions (e.g., 600).
    pub fn credentials_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("credentials.json"))
    }

    /// Returns the path to the persisted-session file.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}
