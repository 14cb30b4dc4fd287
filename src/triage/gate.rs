use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::classifier::{Classifier, ClassifierRequest};
use super::parse::{parse_response, screen};
use super::prompt::build_prompt;
use super::TriageResult;
use crate::imaging::EncodedImage;
use crate::model::{Category, Priority};

/// Summary attached when the classifier could not be used
pub const FALLBACK_SUMMARY: &str = "Manual verification required (AI scan failed).";

/// Default upper bound on one classifier call
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(20);

/// Where a verdict came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictSource {
    /// The classifier's own answer
    Classifier,
    /// The classifier claimed a match but screening overrode it
    Screened,
    /// The classifier failed or timed out; the reason is kept for the log
    Fallback(String),
}

/// Outcome of running a photo through the gate
#[derive(Debug, Clone, PartialEq)]
pub struct GateVerdict {
    pub result: TriageResult,
    pub source: VerdictSource,
}

impl GateVerdict {
    pub fn is_match(&self) -> bool {
        self.result.matches_category
    }

    /// The gate failed open; the UI shows a soft notice
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, VerdictSource::Fallback(_))
    }

    fn fallback(reason: String) -> Self {
        Self {
            result: TriageResult {
                matches_category: true,
                priority: Priority::Medium,
                summary: FALLBACK_SUMMARY.to_string(),
            },
            source: VerdictSource::Fallback(reason),
        }
    }
}

/// Decides whether a photo is plausible evidence for its declared category.
///
/// The gate never errors: classifier failures, timeouts and unparseable
/// answers all fail open with a Medium priority so reporting stays available.
#[derive(Clone)]
pub struct TriageGate {
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl TriageGate {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[instrument(skip(self, image), fields(category = %category))]
    pub async fn assess(&self, image: &EncodedImage, category: Category) -> GateVerdict {
        let request = ClassifierRequest {
            image_base64: image.payload().to_string(),
            mime_type: image.mime_type().to_string(),
            category,
            prompt: build_prompt(category),
        };

        let text = match tokio::time::timeout(self.timeout, self.classifier.classify(&request)).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "classifier failed, accepting photo for manual review");
                return GateVerdict::fallback(e.to_string());
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "classifier timed out, accepting photo for manual review");
                return GateVerdict::fallback(format!(
                    "classifier timed out after {:?}",
                    self.timeout
                ));
            }
        };

        let parsed = match parse_response(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "unparseable classifier answer, accepting photo for manual review");
                return GateVerdict::fallback(e.to_string());
            }
        };

        let verdict = match screen(&parsed) {
            Some(screened) => GateVerdict {
                result: screened,
                source: VerdictSource::Screened,
            },
            None => GateVerdict {
                result: parsed,
                source: VerdictSource::Classifier,
            },
        };

        info!(
            matches = verdict.result.matches_category,
            priority = %verdict.result.priority,
            source = ?verdict.source,
            "triage verdict"
        );
        verdict
    }
}
