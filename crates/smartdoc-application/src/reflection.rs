//! Metacognitive checkpoint collected before evaluation submission.
//!
//! The trainee must answer every reflection question before the diagnosis
//! is sent for evaluation; an unanswered question blocks submission.

use std::collections::BTreeMap;

use smartdoc_api::types::ReflectionSubmission;
use smartdoc_core::SessionState;

/// The reflection questions, in the order they are asked.
pub const REFLECTION_QUESTIONS: [&str; 5] = [
    "What is the single most compelling piece of evidence that supports your chosen diagnosis?",
    "What is one piece of evidence that might argue against your diagnosis?",
    "What else could this be? List at least two reasonable alternative diagnoses.",
    "For one of your alternative diagnoses, what specific information would help rule it in or out?",
    "Have you considered and ruled out any potential must-not-miss or life-threatening conditions?",
];

/// Returns true when every reflection question has a non-empty answer.
pub fn validate_reflection(answers: &BTreeMap<String, String>) -> bool {
    answers.len() == REFLECTION_QUESTIONS.len()
        && answers.values().all(|answer| !answer.trim().is_empty())
}

/// Builds the evaluation submission from the diagnosis, the collected
/// answers, and the current session state.
pub fn build_submission(
    diagnosis: &str,
    answers: BTreeMap<String, String>,
    state: &SessionState,
) -> ReflectionSubmission {
    ReflectionSubmission {
        diagnosis: diagnosis.to_string(),
        metacognitive_responses: answers,
        session_id: state.session_id().map(str::to_string),
        case_context: Some(serde_json::json!({
            "discovered_count": state.discovered_count(),
            "total_available": state.total_available_info(),
            "bias_warnings": state.bias_warning_count(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_answers() -> BTreeMap<String, String> {
        REFLECTION_QUESTIONS
            .iter()
            .map(|question| (question.to_string(), "An answer.".to_string()))
            .collect()
    }

    #[test]
    fn test_validate_accepts_complete_answers() {
        assert!(validate_reflection(&full_answers()));
    }

    #[test]
    fn test_validate_rejects_blank_or_missing_answers() {
        let mut answers = full_answers();
        answers.insert(REFLECTION_QUESTIONS[0].to_string(), "   ".to_string());
        assert!(!validate_reflection(&answers));

        let mut answers = full_answers();
        answers.remove(REFLECTION_QUESTIONS[4]);
        assert!(!validate_reflection(&answers));
    }

    #[test]
    fn test_build_submission_carries_session_context() {
        let mut state = SessionState::new();
        let session_id = state.new_session();
        state.add_discovery(smartdoc_core::Category::History, "fever", "38C");
        state.set_total_available_info(Some(20));
        state.inc_bias_warnings(1);

        let submission = build_submission("Pneumonia", full_answers(), &state);
        assert_eq!(submission.diagnosis, "Pneumonia");
        assert_eq!(submission.session_id, Some(session_id));
        let context = submission.case_context.unwrap();
        assert_eq!(context["discovered_count"], 1);
        assert_eq!(context["total_available"], 20);
        assert_eq!(context["bias_warnings"], 1);
    }
}
