/// AI triage module
///
/// This module handles:
/// - Building the inspection prompt (prompt.rs)
/// - The vision classifier contract and its HTTP adapter (classifier.rs)
/// - Extracting and screening the classifier's JSON answer (parse.rs)
/// - The timeout + fail-open gate the capture workflow calls (gate.rs)

pub mod classifier;
pub mod gate;
pub mod parse;
pub mod prompt;

use serde::{Deserialize, Serialize};

use crate::model::Priority;

pub use classifier::{Classifier, ClassifierError, ClassifierRequest, GeminiClassifier};
pub use gate::{GateVerdict, TriageGate, VerdictSource, FALLBACK_SUMMARY};

/// Structured triage answer: `{ matchesCategory, priority, summary }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub matches_category: bool,
    pub priority: Priority,
    pub summary: String,
}
