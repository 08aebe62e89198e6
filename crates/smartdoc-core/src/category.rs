//! Clinical information categories and backend label normalization.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The fixed set of categories a discovered clinical fact can belong to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    History,
    Medications,
    Examination,
    Labs,
    Imaging,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 5] = [
        Category::History,
        Category::Medications,
        Category::Examination,
        Category::Labs,
        Category::Imaging,
    ];

    /// Maps a backend-supplied category label onto the fixed category set.
    ///
    /// The backend emits labels under several naming schemes (human-readable
    /// titles, snake_case keys, mixed casing), all enumerated here.
    /// Unrecognized labels fall back to [`Category::History`] rather than
    /// erroring, so a new backend label can never drop a discovery.
    pub fn normalize(raw: &str) -> Category {
        match raw {
            "Clinical History" | "Medical History" | "History" | "HPI"
            | "Presenting Symptoms" | "medical_history" | "presenting_symptoms"
            | "clinical_assessment" | "hpi" | "history" | "general" => Category::History,

            "Current Medications" | "Medications" | "current_medications"
            | "medications" => Category::Medications,

            "Physical Examination" | "Physical Exam" | "Examination"
            | "physical_examination" | "physical_exam" | "examination" | "exam" => {
                Category::Examination
            }

            "Laboratory" | "Labs" | "Diagnostic Results" | "diagnostic_results"
            | "laboratory" | "labs" => Category::Labs,

            "Imaging" | "imaging" => Category::Imaging,

            _ => Category::History,
        }
    }

    /// Human-readable title for display surfaces.
    pub fn title(&self) -> &'static str {
        match self {
            Category::History => "Clinical History",
            Category::Medications => "Current Medications",
            Category::Examination => "Physical Examination",
            Category::Labs => "Laboratory",
            Category::Imaging => "Imaging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_and_snake_case_agree() {
        assert_eq!(Category::normalize("Physical Exam"), Category::Examination);
        assert_eq!(Category::normalize("physical_exam"), Category::Examination);
        assert_eq!(Category::normalize("Diagnostic Results"), Category::Labs);
        assert_eq!(Category::normalize("diagnostic_results"), Category::Labs);
        assert_eq!(
            Category::normalize("Current Medications"),
            Category::normalize("current_medications")
        );
    }

    #[test]
    fn test_normalize_history_variants() {
        for raw in ["Clinical History", "HPI", "hpi", "presenting_symptoms", "general"] {
            assert_eq!(Category::normalize(raw), Category::History);
        }
    }

    #[test]
    fn test_normalize_unknown_defaults_to_history() {
        assert_eq!(Category::normalize("unknown_xyz"), Category::History);
        assert_eq!(Category::normalize(""), Category::History);
    }

    #[test]
    fn test_display_matches_serde_rename() {
        assert_eq!(Category::Examination.to_string(), "examination");
        let json = serde_json::to_string(&Category::Labs).unwrap();
        assert_eq!(json, "\"labs\"");
    }
}
