use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use smartdoc_application::restore::{ReplaySink, SessionSnapshot, restore_session};
use smartdoc_core::SessionState;
use smartdoc_core::session::{ChatMessage, ConversationChannel, MessageRole};
use smartdoc_infrastructure::SessionStorage;

/// Replays restored messages into per-channel terminal sections.
struct TerminalSink {
    current: Option<ConversationChannel>,
}

#[async_trait]
impl ReplaySink for TerminalSink {
    async fn ready(&mut self) {
        // The terminal surface exists as soon as the process does, so
        // readiness resolves immediately; restoration still awaits it.
    }

    fn replay(&mut self, channel: ConversationChannel, message: &ChatMessage) {
        if self.current != Some(channel) {
            println!("\n{}", format!("--- {channel} ---").bold());
            self.current = Some(channel);
        }
        let speaker = match message.role {
            MessageRole::User => "you".cyan(),
            MessageRole::Assistant => "patient".green(),
            MessageRole::System => "system".dimmed(),
        };
        println!("{}: {}", speaker, message.content);
    }
}

pub async fn run(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read snapshot file {}", file.display()))?;
    let snapshot = SessionSnapshot::from_json(&content).context("Failed to parse snapshot JSON")?;

    let mut state = SessionState::new();
    let mut sink = TerminalSink { current: None };
    let summary = restore_session(&mut state, snapshot, &mut sink).await;

    // The next `interview` run continues the restored session.
    SessionStorage::new()?.save_session_id(&summary.session_id)?;

    println!(
        "\n{} session {}: {} discoveries, {} bias warnings, {} messages.",
        "Restored".green().bold(),
        summary.session_id,
        summary.discovery_count,
        summary.bias_warning_count,
        summary.message_count
    );

    Ok(())
}
