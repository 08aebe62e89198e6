//! Client configuration file (config.toml).
//!
//! Overrides for the resolved endpoints: an explicit API origin (a terminal
//! client has no document origin to be relative to), the prefer-versioned
//! flag, and the gateway debug flag. A missing file yields defaults.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use smartdoc_core::endpoints::Endpoints;

use super::StorageError;
use crate::paths::SmartDocPaths;

fn default_prefer_v1() -> bool {
    true
}

/// Endpoint/gateway overrides persisted in config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Explicit API origin, e.g. `https://smartdoc.example.org`.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// When false, the gateway skips versioned endpoints entirely.
    #[serde(default = "default_prefer_v1")]
    pub prefer_v1: bool,
    /// Gates request/response logging in the gateway.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            prefer_v1: true,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Applies the overrides to freshly resolved endpoints.
    pub fn apply_to(&self, endpoints: Endpoints) -> Endpoints {
        let mut endpoints = endpoints
            .with_prefer_v1(self.prefer_v1)
            .with_debug(self.debug);
        if let Some(origin) = &self.api_base_url {
            endpoints = endpoints.with_api_base(origin);
        }
        endpoints
    }
}

/// Storage for the client configuration file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage at the default path (`~/.config/smartdoc/config.toml`).
    pub fn new() -> Result<Self, StorageError> {
        let path = SmartDocPaths::config_file()?;
        Ok(Self { path })
    }

    /// Creates storage at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(&self) -> Result<ClientConfig, StorageError> {
        if !self.path.exists() {
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration atomically (tmp file + rename).
    pub fn save(&self, config: &ClientConfig) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}
