use anyhow::Result;
use colored::Colorize;

use super::build_client;

pub async fn run() -> Result<()> {
    let client = build_client()?;

    match client.health_check().await {
        Ok(health) => {
            let status = health.status.unwrap_or_else(|| "ok".to_string());
            println!("{} backend status: {}", "Connected.".green().bold(), status);
        }
        Err(err) => {
            println!("{} {}", "Disconnected.".red().bold(), err);
        }
    }

    Ok(())
}
