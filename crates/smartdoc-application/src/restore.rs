//! Session restoration protocol.
//!
//! Rebuilds the in-memory session state from a persisted snapshot and
//! replays the stored conversation into the presentation surface. State is
//! replaced wholesale; restoration never merges with what is already in
//! memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartdoc_core::session::{ChatMessage, ConversationChannel, MessageRole};
use smartdoc_core::{Category, SessionState};

/// A persisted discovery within a session snapshot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotDiscovery {
    #[serde(default)]
    pub category: String,
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A persisted chat message within a session snapshot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotMessage {
    pub content: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub context: String,
}

/// A server-persisted representation of a session, used to rebuild client
/// state after a reload.
///
/// Missing `discoveries`, `bias_warnings` or `messages` arrays deserialize
/// as empty collections, never as errors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    #[serde(default)]
    pub discoveries: Vec<SnapshotDiscovery>,
    #[serde(default)]
    pub bias_warnings: Vec<serde_json::Value>,
    #[serde(default)]
    pub messages: Vec<SnapshotMessage>,
}

impl SessionSnapshot {
    /// Parses a snapshot from its JSON representation.
    ///
    /// Only structurally invalid JSON fails; absent collections fall back
    /// to empty ones.
    pub fn from_json(content: &str) -> smartdoc_core::Result<SessionSnapshot> {
        Ok(serde_json::from_str(content)?)
    }
}

/// The surface restored messages are replayed into.
///
/// Restoration awaits [`ReplaySink::ready`] after the state store is
/// rebuilt and before the first message is replayed, so a surface that
/// mounts asynchronously signals readiness explicitly instead of relying
/// on a delay.
#[async_trait]
pub trait ReplaySink {
    /// Resolves once the surface can accept replayed messages.
    async fn ready(&mut self);

    /// Replays one message into the given channel surface.
    fn replay(&mut self, channel: ConversationChannel, message: &ChatMessage);
}

/// Diagnostic summary emitted after a restoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestorationSummary {
    pub session_id: String,
    pub discovery_count: u64,
    pub bias_warning_count: u64,
    pub message_count: usize,
}

/// Rebuilds the state store from a snapshot and replays stored messages.
///
/// The procedure, in order:
/// 1. replace the session identifier with the snapshot's;
/// 2. reset all per-category discovery maps;
/// 3. reset the discovered-count to 0;
/// 4. insert each snapshot discovery in array order (categories normalized,
///    count incremented per entry; see
///    [`SessionState::restore_discovery`] for the no-dedup semantics);
/// 5. set the bias-warning count to the length of the bias-warnings array;
/// 6. group messages by conversation channel (unrecognized context goes to
///    the primary channel), preserving array order within each group, and
///    replay them once the sink reports ready;
/// 7. emit the restoration summary.
pub async fn restore_session<S>(
    state: &mut SessionState,
    snapshot: SessionSnapshot,
    sink: &mut S,
) -> RestorationSummary
where
    S: ReplaySink + ?Sized,
{
    state.begin_restore(snapshot.session_id.clone());

    for discovery in &snapshot.discoveries {
        let category = Category::normalize(&discovery.category);
        let timestamp = discovery.timestamp.unwrap_or_else(Utc::now);
        state.restore_discovery(category, &discovery.label, &discovery.value, timestamp);
    }

    state.set_bias_warning_count(snapshot.bias_warnings.len() as u64);

    let mut grouped: Vec<(ConversationChannel, Vec<ChatMessage>)> = ConversationChannel::ALL
        .iter()
        .map(|channel| (*channel, Vec::new()))
        .collect();
    for stored in &snapshot.messages {
        let channel = ConversationChannel::from_label(&stored.context);
        let message = ChatMessage {
            role: MessageRole::from_label(&stored.role),
            content: stored.content.clone(),
            channel,
        };
        grouped
            .iter_mut()
            .find(|(c, _)| *c == channel)
            .expect("all channels are pre-seeded")
            .1
            .push(message);
    }

    sink.ready().await;
    for (channel, messages) in &grouped {
        for message in messages {
            sink.replay(*channel, message);
        }
    }

    let summary = RestorationSummary {
        session_id: snapshot.session_id,
        discovery_count: state.discovered_count(),
        bias_warning_count: state.bias_warning_count(),
        message_count: snapshot.messages.len(),
    };
    tracing::info!(
        "[RESTORE] Session restored: id={}, discoveries={}, bias_warnings={}, messages={}",
        summary.session_id,
        summary.discovery_count,
        summary.bias_warning_count,
        summary.message_count
    );
    summary
}
