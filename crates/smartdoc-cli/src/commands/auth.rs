use anyhow::{Context, Result};
use colored::Colorize;
use smartdoc_infrastructure::CredentialStorage;

use super::build_client;

pub async fn login(code: &str) -> Result<()> {
    let client = build_client()?;
    let response = client.login(code).await.context("Login failed")?;

    CredentialStorage::new()?.save_token(&response.token)?;
    println!("{}", "Logged in successfully.".green());
    Ok(())
}

pub async fn logout() -> Result<()> {
    let client = build_client()?;

    // Best effort against the backend; the local token is cleared either way.
    if client.token().is_some() {
        if let Err(err) = client.logout().await {
            tracing::warn!("[AUTH] Logout request failed: {}", err);
        }
    }

    CredentialStorage::new()?.clear()?;
    println!("{}", "Logged out.".yellow());
    Ok(())
}
