//! Session state for a trainee interview.
//!
//! This module contains the in-memory record of everything the trainee has
//! uncovered during a simulated patient encounter: the session identifier,
//! the discovered clinical facts grouped by category, and the aggregate
//! counters driving the progress and bias indicators.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Prefix for client-generated session identifiers.
pub const SESSION_ID_PREFIX: &str = "SESS_";

const SESSION_ID_SUFFIX_LEN: usize = 9;

/// The conversation channel a chat message belongs to.
///
/// Each channel is a separate surface in the encounter (history taking with
/// the patient's son, bedside examination, labs/imaging with the resident).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationChannel {
    Anamnesis,
    Examination,
    Labs,
}

impl ConversationChannel {
    /// The primary channel, used when a message carries no recognizable
    /// channel label.
    pub const PRIMARY: ConversationChannel = ConversationChannel::Anamnesis;

    /// All channels, in display order.
    pub const ALL: [ConversationChannel; 3] = [
        ConversationChannel::Anamnesis,
        ConversationChannel::Examination,
        ConversationChannel::Labs,
    ];

    /// The wire label sent as the `context` field of a chat request.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConversationChannel::Anamnesis => "anamnesis",
            ConversationChannel::Examination => "exam",
            ConversationChannel::Labs => "labs",
        }
    }

    /// Parses a wire label, falling back to [`ConversationChannel::PRIMARY`]
    /// for anything unrecognized.
    pub fn from_label(label: &str) -> ConversationChannel {
        match label {
            "anamnesis" => ConversationChannel::Anamnesis,
            "exam" | "examination" => ConversationChannel::Examination,
            "labs" => ConversationChannel::Labs,
            _ => ConversationChannel::PRIMARY,
        }
    }
}

impl std::fmt::Display for ConversationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Parses a persisted role label. "bot" is a legacy spelling of the
    /// assistant role; anything unrecognized is treated as assistant.
    pub fn from_label(label: &str) -> MessageRole {
        match label {
            "user" => MessageRole::User,
            "system" => MessageRole::System,
            "assistant" | "bot" => MessageRole::Assistant,
            _ => MessageRole::Assistant,
        }
    }
}

/// A single chat message, owned by the presentation surface but carried
/// through the restoration protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub channel: ConversationChannel,
}

/// A single clinical fact the trainee has uncovered, keyed by
/// `(category, label)` in the session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub label: String,
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of the session state at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub session_id: Option<String>,
    pub total_available_info: u64,
    pub discovered_count: u64,
    pub bias_warning_count: u64,
    /// Discoveries per category, ordered by discovery timestamp.
    pub discovered: HashMap<Category, Vec<Discovery>>,
}

/// The mutable record of the current encounter.
///
/// `SessionState` is an explicit context object passed to the handlers that
/// need it; it is deliberately not process-global so that concurrent
/// sessions (and tests) never share state.
///
/// All mutation is synchronous. The type assumes a single writer context:
/// callers running it from multiple threads must add their own mutual
/// exclusion around read-modify-write sequences, or the
/// "exactly one increment per new key" invariant of
/// [`SessionState::add_discovery`] is lost.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session_id: Option<String>,
    discovered: HashMap<Category, HashMap<String, Discovery>>,
    total_available_info: u64,
    discovered_count: u64,
    bias_warning_count: u64,
}

impl SessionState {
    /// Creates an empty state with no session identifier.
    pub fn new() -> Self {
        let mut discovered = HashMap::new();
        for category in Category::ALL {
            discovered.insert(category, HashMap::new());
        }
        Self {
            session_id: None,
            discovered,
            total_available_info: 0,
            discovered_count: 0,
            bias_warning_count: 0,
        }
    }

    /// Generates a fresh session identifier and makes it current.
    ///
    /// The identifier is `SESS_` followed by nine random uppercase
    /// alphanumerics. Discoveries and counters are intentionally left
    /// untouched; callers wanting a clean slate start from a new
    /// `SessionState`.
    ///
    /// # Returns
    ///
    /// The new identifier.
    pub fn new_session(&mut self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_SUFFIX_LEN)
            .map(char::from)
            .collect();
        let id = format!("{}{}", SESSION_ID_PREFIX, suffix.to_ascii_uppercase());
        tracing::debug!("[STATE] New session created: {}", id);
        self.session_id = Some(id.clone());
        id
    }

    /// The current session identifier, if one exists.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Inserts or overwrites the discovery at `(category, label)`.
    ///
    /// The discovered-count increments only when the key did not previously
    /// exist; a repeated discovery overwrites value and timestamp without
    /// counting again. Value content is free text and not validated.
    ///
    /// # Returns
    ///
    /// `true` if the key was new.
    pub fn add_discovery(&mut self, category: Category, label: &str, value: &str) -> bool {
        let entries = self.discovered.entry(category).or_default();
        let is_new = !entries.contains_key(label);
        entries.insert(
            label.to_string(),
            Discovery {
                label: label.to_string(),
                value: value.to_string(),
                timestamp: Utc::now(),
            },
        );
        if is_new {
            self.discovered_count += 1;
            tracing::debug!(
                "[STATE] New discovery added: {}/{} = {}",
                category,
                label,
                value
            );
        }
        is_new
    }

    /// Overwrites the server-declared upper bound on discoverable facts.
    /// A missing value is treated as 0.
    pub fn set_total_available_info(&mut self, n: Option<u64>) {
        self.total_available_info = n.unwrap_or(0);
        tracing::debug!("[STATE] Total available info set to: {}", self.total_available_info);
    }

    /// Adds `n` to the cumulative bias-warning count.
    pub fn inc_bias_warnings(&mut self, n: u64) {
        self.bias_warning_count += n;
        tracing::debug!("[STATE] Bias warnings count: {}", self.bias_warning_count);
    }

    pub fn total_available_info(&self) -> u64 {
        self.total_available_info
    }

    pub fn discovered_count(&self) -> u64 {
        self.discovered_count
    }

    pub fn bias_warning_count(&self) -> u64 {
        self.bias_warning_count
    }

    /// The discoveries recorded for one category, unordered.
    pub fn discoveries(&self, category: Category) -> impl Iterator<Item = &Discovery> {
        self.discovered.get(&category).into_iter().flatten().map(|(_, d)| d)
    }

    /// Returns the current state for read-only consumption, with each
    /// category's discoveries ordered by timestamp.
    pub fn snapshot(&self) -> StateSnapshot {
        let mut discovered = HashMap::new();
        for category in Category::ALL {
            let mut entries: Vec<Discovery> = self
                .discovered
                .get(&category)
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default();
            entries.sort_by_key(|d| d.timestamp);
            discovered.insert(category, entries);
        }
        StateSnapshot {
            session_id: self.session_id.clone(),
            total_available_info: self.total_available_info,
            discovered_count: self.discovered_count,
            bias_warning_count: self.bias_warning_count,
            discovered,
        }
    }

    // ------------------------------------------------------------------
    // Restoration entry points.
    //
    // These are used exclusively by the session restoration protocol in
    // smartdoc-application, which replaces state wholesale and never
    // merges with what is already in memory.
    // ------------------------------------------------------------------

    /// Replaces the session identifier, clears every per-category map and
    /// zeroes the discovered-count. Bias and total counters are set
    /// separately by the restoration protocol.
    pub fn begin_restore(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
        for entries in self.discovered.values_mut() {
            entries.clear();
        }
        self.discovered_count = 0;
    }

    /// Inserts a discovery from a persisted snapshot and unconditionally
    /// increments the discovered-count.
    ///
    /// Unlike [`SessionState::add_discovery`], restoration does not
    /// deduplicate: every snapshot entry counts once even if two entries
    /// collide on the same key (last write wins on the stored value). A
    /// persisted snapshot is assumed already deduplicated upstream.
    pub fn restore_discovery(
        &mut self,
        category: Category,
        label: &str,
        value: &str,
        timestamp: DateTime<Utc>,
    ) {
        self.discovered.entry(category).or_default().insert(
            label.to_string(),
            Discovery {
                label: label.to_string(),
                value: value.to_string(),
                timestamp,
            },
        );
        self.discovered_count += 1;
    }

    /// Sets the bias-warning count to an absolute value (a count, not a
    /// running accumulation).
    pub fn set_bias_warning_count(&mut self, n: u64) {
        self.bias_warning_count = n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_session_ids_are_distinct_and_prefixed() {
        let mut state = SessionState::new();
        let first = state.new_session();
        let second = state.new_session();
        assert!(first.starts_with(SESSION_ID_PREFIX));
        assert!(second.starts_with(SESSION_ID_PREFIX));
        assert_eq!(first.len(), SESSION_ID_PREFIX.len() + SESSION_ID_SUFFIX_LEN);
        assert_ne!(first, second);
        assert_eq!(state.session_id(), Some(second.as_str()));
    }

    #[test]
    fn test_discovered_count_counts_distinct_keys_only() {
        let mut state = SessionState::new();
        assert!(state.add_discovery(Category::History, "fever", "38C"));
        assert!(!state.add_discovery(Category::History, "fever", "39C"));
        assert!(state.add_discovery(Category::Labs, "fever", "n/a"));
        assert!(state.add_discovery(Category::History, "cough", "dry"));
        assert_eq!(state.discovered_count(), 3);

        // Repeats never move the counter, regardless of how often.
        for _ in 0..5 {
            state.add_discovery(Category::History, "cough", "dry");
        }
        assert_eq!(state.discovered_count(), 3);
    }

    #[test]
    fn test_repeated_discovery_overwrites_value() {
        let mut state = SessionState::new();
        state.add_discovery(Category::History, "fever", "38C");
        state.add_discovery(Category::History, "fever", "39C");
        let stored: Vec<_> = state.discoveries(Category::History).collect();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "39C");
    }

    #[test]
    fn test_set_total_available_info_treats_missing_as_zero() {
        let mut state = SessionState::new();
        state.set_total_available_info(Some(12));
        assert_eq!(state.total_available_info(), 12);
        state.set_total_available_info(None);
        assert_eq!(state.total_available_info(), 0);
    }

    #[test]
    fn test_restore_discovery_does_not_dedup() {
        let mut state = SessionState::new();
        state.add_discovery(Category::Imaging, "cxr", "clear");
        state.begin_restore("S1");
        assert_eq!(state.discovered_count(), 0);
        assert_eq!(state.discoveries(Category::Imaging).count(), 0);

        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        state.restore_discovery(Category::History, "fever", "38C", t1);
        state.restore_discovery(Category::History, "fever", "39C", t2);
        assert_eq!(state.discovered_count(), 2);
        let stored: Vec<_> = state.discoveries(Category::History).collect();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "39C");
    }

    #[test]
    fn test_snapshot_orders_by_timestamp() {
        let mut state = SessionState::new();
        state.begin_restore("S1");
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap();
        state.restore_discovery(Category::Labs, "WBC", "12k", t2);
        state.restore_discovery(Category::Labs, "CRP", "80", t1);
        let snapshot = state.snapshot();
        let labs = &snapshot.discovered[&Category::Labs];
        assert_eq!(labs[0].label, "CRP");
        assert_eq!(labs[1].label, "WBC");
    }

    #[test]
    fn test_channel_label_round_trip_and_default() {
        assert_eq!(ConversationChannel::from_label("exam"), ConversationChannel::Examination);
        assert_eq!(ConversationChannel::from_label("labs"), ConversationChannel::Labs);
        assert_eq!(
            ConversationChannel::from_label("something_else"),
            ConversationChannel::PRIMARY
        );
        for channel in ConversationChannel::ALL {
            assert_eq!(ConversationChannel::from_label(channel.as_label()), channel);
        }
    }
}
