//! Report entity and its lifecycle value types
//!
//! `Report` is what the views read back from the store. `NewReport` is the
//! record a verified draft turns into; it can only be built with every
//! required field present. `ReportPatch` is the partial update written by
//! status and confirmation changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Category;
use crate::geo::Coordinates;

/// Opaque document id assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, as shown on map popups
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a report sits in the admin/citizen workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    Pending,
    #[serde(rename = "In-Progress")]
    InProgress,
    Resolved,
    #[serde(rename = "Re-Opened")]
    ReOpened,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::ReOpened,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In-Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::ReOpened => "Re-Opened",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(ReportStatus::Pending),
            "In-Progress" | "In Progress" => Ok(ReportStatus::InProgress),
            "Resolved" => Ok(ReportStatus::Resolved),
            "Re-Opened" | "Reopened" => Ok(ReportStatus::ReOpened),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Triage severity assigned by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "Emergency", alias = "Critical")]
    High,
    #[serde(alias = "Normal")]
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Accepts the three current levels plus the legacy admin labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "emergency" | "critical" => Ok(Priority::High),
            "medium" | "normal" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// The citizen's answer to "did the fix solve your problem?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confirmation {
    Fixed,
    #[serde(rename = "Not Fixed")]
    NotFixed,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Fixed => "Fixed",
            Confirmation::NotFixed => "Not Fixed",
        }
    }
}

impl FromStr for Confirmation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Fixed" => Ok(Confirmation::Fixed),
            "Not Fixed" => Ok(Confirmation::NotFixed),
            other => Err(format!("unknown confirmation: {other}")),
        }
    }
}

/// A persisted report as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: ReportId,

    // ========== Reporter ==========
    pub email: String,
    pub citizen_name: String,

    // ========== Classification ==========
    pub category: Category,
    /// Stored label that matched no known category; `category` is then Other
    pub legacy_category: Option<String>,
    pub description: String,

    // ========== Evidence ==========
    /// Compressed photo as a data URL (absent on some legacy records)
    pub image: Option<String>,
    /// Capture position; legacy records may lack one
    pub location: Option<Coordinates>,

    // ========== Triage ==========
    pub priority: Priority,
    pub ai_analysis: String,
    pub is_ai_verified: bool,

    // ========== Lifecycle ==========
    pub status: ReportStatus,
    pub created_at: Option<DateTime<Utc>>,
    /// Display date written alongside `created_at`
    pub date: Option<String>,
    pub citizen_confirmation: Option<Confirmation>,
    pub confirmation_date: Option<DateTime<Utc>>,

    pub city: String,
}

impl Report {
    /// A Resolved report asks its owner for confirmation exactly once
    pub fn needs_confirmation(&self) -> bool {
        self.status == ReportStatus::Resolved && self.citizen_confirmation.is_none()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }

    /// Label to show: the stored legacy label if there was one
    pub fn category_label(&self) -> &str {
        self.legacy_category
            .as_deref()
            .unwrap_or_else(|| self.category.label())
    }
}

/// A fully verified record ready to be created in the store.
///
/// Coordinates and image are not optional here: a `NewReport` can only be
/// built from a draft that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub email: String,
    pub citizen_name: String,
    pub category: Category,
    pub description: String,
    pub image: String,
    pub location: Coordinates,
    pub priority: Priority,
    pub ai_analysis: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

impl NewReport {
    /// Status every new report starts in
    pub fn status(&self) -> ReportStatus {
        ReportStatus::Pending
    }

    /// Only gate-approved drafts become a `NewReport`
    pub fn is_ai_verified(&self) -> bool {
        true
    }

    /// Short display date kept for older dashboards
    pub fn display_date(&self) -> String {
        self.created_at.format("%m/%d/%Y").to_string()
    }
}

/// Partial update for the lifecycle fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub citizen_confirmation: Option<Confirmation>,
    pub confirmation_date: Option<DateTime<Utc>>,
}

impl ReportPatch {
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a local copy after the store accepted it
    pub fn apply_to(&self, report: &mut Report) {
        if let Some(status) = self.status {
            report.status = status;
        }
        if let Some(confirmation) = self.citizen_confirmation {
            report.citizen_confirmation = Some(confirmation);
        }
        if let Some(date) = self.confirmation_date {
            report.confirmation_date = Some(date);
        }
    }
}
