//! Classifier response parsing and content screening

use serde::Deserialize;
use thiserror::Error;

use super::TriageResult;
use crate::model::Priority;

/// Summary used when screening overrides a claimed match
pub const INVALID_CONTENT_SUMMARY: &str = "Invalid image content.";

/// Word stems that mean the photo is not of a physical scene
const NON_PHYSICAL_STEMS: [&str; 4] = ["screenshot", "text", "programm", "coding"];

/// Matched as whole words only, so "barcode" passes
const NON_PHYSICAL_WORDS: [&str; 3] = ["code", "codes", "coded"];

/// Physical-scene words that share a stem above
const PHYSICAL_CARVE_OUTS: [&str; 2] = ["textur", "textil"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object in classifier response")]
    NoPayload,

    #[error("malformed triage payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTriage {
    matches_category: bool,
    priority: Priority,
    summary: String,
}

/// Slice from the first `{` to the last `}` inclusive
pub fn extract_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the classifier text into a triage result (before screening)
pub fn parse_response(text: &str) -> Result<TriageResult, ParseError> {
    let payload = extract_payload(text).ok_or(ParseError::NoPayload)?;
    let raw: RawTriage = serde_json::from_str(payload)?;
    Ok(TriageResult {
        matches_category: raw.matches_category,
        priority: raw.priority,
        summary: raw.summary.trim().to_string(),
    })
}

/// True when the summary describes something that is not a physical scene
pub fn mentions_non_physical(summary: &str) -> bool {
    summary
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .any(|word| {
            if PHYSICAL_CARVE_OUTS.iter().any(|p| word.starts_with(p)) {
                return false;
            }
            NON_PHYSICAL_WORDS.contains(&word.as_str())
                || NON_PHYSICAL_STEMS.iter().any(|stem| word.starts_with(stem))
        })
}

/// Override a claimed match whose summary gives the photo away.
///
/// Returns `None` when the result stands as is.
pub fn screen(result: &TriageResult) -> Option<TriageResult> {
    if result.matches_category && mentions_non_physical(&result.summary) {
        Some(TriageResult {
            matches_category: false,
            priority: Priority::Low,
            summary: INVALID_CONTENT_SUMMARY.to_string(),
        })
    } else {
        None
    }
}
