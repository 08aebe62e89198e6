//! Applying a chat turn's response to the session state.

use smartdoc_api::types::ChatResponse;
use smartdoc_core::{Category, SessionState};

/// What changed when a chat response was applied, for the presentation
/// surface to redraw.
#[derive(Debug, Clone, Default)]
pub struct AppliedChatTurn {
    /// Discoveries applied this turn, in event order, categories normalized.
    pub discoveries: Vec<(Category, String)>,
    /// Whether the total-available count was updated.
    pub progress_updated: bool,
    /// Bias alerts surfaced this turn as (headline, body) pairs.
    pub bias_warnings: Vec<(String, String)>,
}

/// Applies one chat response to the state store.
///
/// Discovery events are normalized through [`Category::normalize`] and
/// inserted in event order; the total-available count is updated only when
/// the response carries one; the bias-warning counter advances by the
/// number of alerts in the response.
pub fn apply_chat_response(state: &mut SessionState, response: &ChatResponse) -> AppliedChatTurn {
    let mut applied = AppliedChatTurn::default();

    for event in &response.discovery_events {
        let category = Category::normalize(&event.category);
        state.add_discovery(category, &event.field, &event.value);
        applied.discoveries.push((category, event.field.clone()));
    }

    if let Some(total) = response.discovery_stats.as_ref().and_then(|stats| stats.total) {
        state.set_total_available_info(Some(total));
        applied.progress_updated = true;
    }

    if !response.bias_warnings.is_empty() {
        state.inc_bias_warnings(response.bias_warnings.len() as u64);
        applied.bias_warnings = response
            .bias_warnings
            .iter()
            .map(|warning| {
                (
                    warning.headline().to_string(),
                    warning.body_text().to_string(),
                )
            })
            .collect();
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartdoc_api::types::{BiasWarning, DiscoveryEvent, DiscoveryStats};

    fn response_with_events(events: Vec<DiscoveryEvent>) -> ChatResponse {
        ChatResponse {
            response: "ok".into(),
            discovery_events: events,
            discovery_stats: None,
            bias_warnings: Vec::new(),
        }
    }

    #[test]
    fn test_events_are_normalized_and_counted_once() {
        let mut state = SessionState::new();
        let response = response_with_events(vec![
            DiscoveryEvent {
                category: "Physical Exam".into(),
                field: "temperature".into(),
                value: "38.4C".into(),
            },
            DiscoveryEvent {
                category: "physical_exam".into(),
                field: "temperature".into(),
                value: "38.6C".into(),
            },
        ]);

        let applied = apply_chat_response(&mut state, &response);

        assert_eq!(applied.discoveries.len(), 2);
        assert_eq!(applied.discoveries[0].0, Category::Examination);
        // Same (category, label) key twice: counted once, last value wins.
        assert_eq!(state.discovered_count(), 1);
        let stored: Vec<_> = state.discoveries(Category::Examination).collect();
        assert_eq!(stored[0].value, "38.6C");
    }

    #[test]
    fn test_total_updates_only_when_present() {
        let mut state = SessionState::new();
        state.set_total_available_info(Some(10));

        let applied = apply_chat_response(&mut state, &response_with_events(Vec::new()));
        assert!(!applied.progress_updated);
        assert_eq!(state.total_available_info(), 10);

        let mut response = response_with_events(Vec::new());
        response.discovery_stats = Some(DiscoveryStats { total: Some(24) });
        let applied = apply_chat_response(&mut state, &response);
        assert!(applied.progress_updated);
        assert_eq!(state.total_available_info(), 24);
    }

    #[test]
    fn test_bias_warnings_accumulate() {
        let mut state = SessionState::new();
        let mut response = response_with_events(Vec::new());
        response.bias_warnings = vec![
            BiasWarning {
                bias_type: Some("anchoring".into()),
                description: Some("Locked onto first impression".into()),
                message: None,
            },
            BiasWarning::default(),
        ];

        let applied = apply_chat_response(&mut state, &response);
        assert_eq!(state.bias_warning_count(), 2);
        assert_eq!(applied.bias_warnings[0].0, "anchoring");
        assert_eq!(applied.bias_warnings[1].1, "Bias detected");

        apply_chat_response(&mut state, &response);
        assert_eq!(state.bias_warning_count(), 4);
    }
}
