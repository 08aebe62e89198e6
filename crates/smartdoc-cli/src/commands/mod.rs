pub mod auth;
pub mod health;
pub mod interview;
pub mod restore;

use anyhow::Result;
use smartdoc_api::ApiClient;
use smartdoc_core::SmartDocError;
use smartdoc_core::endpoints::{Endpoints, LOCAL_DEV_PORT};
use smartdoc_infrastructure::{ConfigStorage, CredentialStorage};

/// Builds the gateway from the resolved endpoints, the config-file
/// overrides, and the persisted bearer token.
///
/// A terminal process has no document origin, so resolution defaults to the
/// local-development origin; a configured `api_base_url` rebases both roots
/// onto an explicit deployment.
pub(crate) fn build_client() -> Result<ApiClient> {
    let config = ConfigStorage::new()
        .and_then(|storage| storage.load())
        .map_err(SmartDocError::from)?;
    let endpoints = config.apply_to(Endpoints::resolve("localhost", Some(LOCAL_DEV_PORT)));

    let mut client = ApiClient::new(endpoints);
    if let Some(token) = CredentialStorage::new()?.load_token()? {
        client.set_token(Some(token));
    }
    Ok(client)
}

/// Prints a prompt and reads one trimmed line from stdin.
pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;

    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
