use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "smartdoc")]
#[command(about = "SmartDoc - terminal client for the clinical training simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interview the simulated patient and submit a diagnosis
    Interview {
        /// Conversation channel to open first (anamnesis, exam, labs)
        #[arg(long, default_value = "anamnesis")]
        channel: String,
        /// Start a fresh session even if a previous one is persisted
        #[arg(long)]
        new_session: bool,
    },
    /// Restore a persisted session snapshot and replay its conversation
    Restore {
        /// Path to a snapshot JSON file
        file: PathBuf,
    },
    /// Check backend connectivity
    Health,
    /// Log in with an access code
    Login {
        /// Access code issued for the study
        code: String,
    },
    /// Log out and clear the stored token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Interview {
            channel,
            new_session,
        } => commands::interview::run(&channel, new_session).await,
        Commands::Restore { file } => commands::restore::run(&file).await,
        Commands::Health => commands::health::run().await,
        Commands::Login { code } => commands::auth::login(&code).await,
        Commands::Logout => commands::auth::logout().await,
    }
}
