//! Report form state
//!
//! A draft only ever holds evidence that the gate accepted for the draft's
//! current category. Changing category drops the evidence, so a verified
//! photo can never be submitted under a category it was not checked for.

use thiserror::Error;
use tracing::debug;

use crate::geo::Coordinates;
use crate::imaging::EncodedImage;
use crate::model::{Category, City, Priority};

/// A photo that passed the gate, with its position and triage result
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub image: EncodedImage,
    pub location: Coordinates,
    /// Category the gate checked the photo against
    pub category: Category,
    pub priority: Priority,
    pub summary: String,
    /// The classifier was unavailable and the photo was accepted for manual review
    pub degraded: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("evidence was verified for {verified}, but the draft is now {current}")]
    StaleEvidence {
        verified: Category,
        current: Category,
    },

    #[error("select a category first")]
    NoCategory,
}

/// Edits coming from the report form
#[derive(Debug, Clone)]
pub enum DraftMessage {
    CategorySelected(Category),
    CitySelected(String),
    DescriptionChanged(String),
    /// The capture pipeline produced verified evidence
    EvidenceCaptured(Evidence),
    /// The user removed the photo
    EvidenceCleared,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    category: Option<Category>,
    city: Option<&'static City>,
    description: String,
    evidence: Option<Evidence>,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: DraftMessage) -> Result<(), DraftError> {
        match message {
            DraftMessage::CategorySelected(category) => {
                self.select_category(category);
                Ok(())
            }
            DraftMessage::CitySelected(name) => self.select_city(&name),
            DraftMessage::DescriptionChanged(text) => {
                self.set_description(text);
                Ok(())
            }
            DraftMessage::EvidenceCaptured(evidence) => self.attach(evidence),
            DraftMessage::EvidenceCleared => {
                self.clear_evidence();
                Ok(())
            }
        }
    }

    // ========== Fields ==========

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Select the category. A change invalidates any captured evidence.
    pub fn select_category(&mut self, category: Category) {
        if self.category != Some(category) && self.evidence.is_some() {
            debug!(%category, "category changed, dropping verified photo");
            self.evidence = None;
        }
        self.category = Some(category);
    }

    pub fn city(&self) -> Option<&'static City> {
        self.city
    }

    pub fn select_city(&mut self, name: &str) -> Result<(), DraftError> {
        let city = City::by_name(name).ok_or_else(|| DraftError::UnknownCity(name.to_string()))?;
        self.city = Some(city);
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    // ========== Evidence ==========

    pub fn evidence(&self) -> Option<&Evidence> {
        self.evidence.as_ref()
    }

    /// Attach evidence verified for the current category
    pub fn attach(&mut self, evidence: Evidence) -> Result<(), DraftError> {
        let current = self.category.ok_or(DraftError::NoCategory)?;
        if evidence.category != current {
            return Err(DraftError::StaleEvidence {
                verified: evidence.category,
                current,
            });
        }
        self.evidence = Some(evidence);
        Ok(())
    }

    pub fn clear_evidence(&mut self) {
        self.evidence = None;
    }

    /// The draft holds a gate-approved photo for its current category
    pub fn is_ai_verified(&self) -> bool {
        matches!((&self.evidence, self.category), (Some(e), Some(c)) if e.category == c)
    }

    /// Names of the fields still needed before submission, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.category.is_none() {
            missing.push("category");
        }
        if self.city.is_none() {
            missing.push("city");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if !self.is_ai_verified() {
            missing.push("verified photo");
        }
        missing
    }

    pub fn is_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Back to an empty form
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
