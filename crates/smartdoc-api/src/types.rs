//! Wire types for the SmartDoc backend API.
//!
//! Response types are decoded tolerantly: optional structures carry
//! `#[serde(default)]` so a backend revision that omits a field never fails
//! the whole turn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// --- Chat ---

/// Body of a chat turn, shared by the legacy and versioned routes.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Wire label of the conversation channel ("anamnesis", "exam", "labs").
    pub context: String,
    pub session_id: String,
}

/// One clinical fact surfaced by the backend during a chat turn.
///
/// The category is a raw backend label; callers normalize it through
/// `Category::normalize` before touching the state store.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DiscoveryEvent {
    pub category: String,
    pub field: String,
    pub value: String,
}

/// Aggregate discovery statistics reported with a chat turn.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DiscoveryStats {
    #[serde(default)]
    pub total: Option<u64>,
}

/// A cognitive-bias alert raised by the backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BiasWarning {
    #[serde(default)]
    pub bias_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BiasWarning {
    /// Alert headline, defaulting when the backend omits the bias type.
    pub fn headline(&self) -> &str {
        self.bias_type.as_deref().unwrap_or("Unknown")
    }

    /// Alert body, preferring `description` over `message`.
    pub fn body_text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("Bias detected")
    }
}

/// Response to a chat turn.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub discovery_events: Vec<DiscoveryEvent>,
    #[serde(default)]
    pub discovery_stats: Option<DiscoveryStats>,
    #[serde(default)]
    pub bias_warnings: Vec<BiasWarning>,
}

// --- Diagnosis & evaluation ---

/// Body of a plain diagnosis submission.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRequest {
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of a diagnosis submission with metacognitive reflection.
///
/// `metacognitive_responses` maps each reflection question to the trainee's
/// answer; a `BTreeMap` keeps the serialized order stable.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionSubmission {
    pub diagnosis: String,
    pub metacognitive_responses: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_context: Option<serde_json::Value>,
}

/// Score and narrative analysis for one evaluated competency.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompetencyEvaluation {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub analysis: Option<String>,
}

/// The per-competency evaluation produced by the backend's LLM evaluator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Evaluation {
    #[serde(default)]
    pub information_gathering: Option<CompetencyEvaluation>,
    #[serde(default)]
    pub diagnostic_accuracy: Option<CompetencyEvaluation>,
    #[serde(default)]
    pub cognitive_bias_awareness: Option<CompetencyEvaluation>,
    #[serde(default)]
    pub comprehensive_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmEvaluation {
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
}

/// Response to an evaluation submission. The structured evaluation is
/// nested under `llm_evaluation.evaluation`; everything else is retained
/// verbatim for the basic results rendering path.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvaluationResponse {
    #[serde(default)]
    pub llm_evaluation: Option<LlmEvaluation>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EvaluationResponse {
    /// The structured per-competency evaluation, when present.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.llm_evaluation.as_ref()?.evaluation.as_ref()
    }
}

// --- Auth & health ---

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_missing_arrays_decode_as_empty() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"response": "The patient is resting."}"#).unwrap();
        assert!(response.discovery_events.is_empty());
        assert!(response.bias_warnings.is_empty());
        assert!(response.discovery_stats.is_none());
    }

    #[test]
    fn test_chat_response_full_shape() {
        let raw = r#"{
            "response": "His temperature is 38.4C.",
            "discovery_events": [
                {"category": "Physical Exam", "field": "temperature", "value": "38.4C"}
            ],
            "discovery_stats": {"total": 24},
            "bias_warnings": [{"bias_type": "anchoring", "message": "Consider alternatives"}]
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.discovery_events[0].field, "temperature");
        assert_eq!(response.discovery_stats.unwrap().total, Some(24));
        assert_eq!(response.bias_warnings[0].headline(), "anchoring");
        assert_eq!(response.bias_warnings[0].body_text(), "Consider alternatives");
    }

    #[test]
    fn test_bias_warning_text_fallbacks() {
        let warning = BiasWarning::default();
        assert_eq!(warning.headline(), "Unknown");
        assert_eq!(warning.body_text(), "Bias detected");

        let warning = BiasWarning {
            bias_type: Some("premature closure".into()),
            description: Some("Diagnosis locked in early".into()),
            message: Some("ignored".into()),
        };
        assert_eq!(warning.body_text(), "Diagnosis locked in early");
    }

    #[test]
    fn test_evaluation_nested_under_llm_evaluation() {
        let raw = r#"{
            "llm_evaluation": {
                "evaluation": {
                    "information_gathering": {"score": 72.0, "analysis": "Broad but shallow."},
                    "diagnostic_accuracy": {"score": 85.0, "analysis": "Correct diagnosis."},
                    "cognitive_bias_awareness": {"score": 40.0, "analysis": "Little reflection."}
                }
            },
            "session_id": "S1"
        }"#;
        let response: EvaluationResponse = serde_json::from_str(raw).unwrap();
        let evaluation = response.evaluation().unwrap();
        assert_eq!(
            evaluation.information_gathering.as_ref().unwrap().score,
            Some(72.0)
        );
        assert!(response.extra.contains_key("session_id"));
    }

    #[test]
    fn test_evaluation_response_without_llm_evaluation() {
        let response: EvaluationResponse =
            serde_json::from_str(r#"{"feedback": "basic"}"#).unwrap();
        assert!(response.evaluation().is_none());
    }
}
