//! Report <-> document encoding
//!
//! Writes always use the canonical field names. Reads go through
//! `decode`, which also understands the field names older clients wrote
//! (`problem` for the category, `imageURL` for the photo) so the rest of the
//! crate only ever sees one shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::geo::Coordinates;
use crate::model::{
    Category, Confirmation, NewReport, Priority, Report, ReportId, ReportPatch, ReportStatus,
};

/// A stored report as field/value pairs
pub type Document = Map<String, Value>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document {id} is not a report: {source}")]
    Shape {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalRecord<'a> {
    email: &'a str,
    citizen_name: &'a str,
    category: Category,
    description: &'a str,
    image: &'a str,
    latitude: f64,
    longitude: f64,
    priority: Priority,
    ai_analysis: &'a str,
    is_ai_verified: bool,
    status: ReportStatus,
    created_at: DateTime<Utc>,
    date: String,
    city: &'a str,
}

/// Encode a new report with the canonical field names
pub fn encode_new(report: &NewReport) -> Document {
    let record = CanonicalRecord {
        email: &report.email,
        citizen_name: &report.citizen_name,
        category: report.category,
        description: &report.description,
        image: &report.image,
        latitude: report.location.latitude,
        longitude: report.location.longitude,
        priority: report.priority,
        ai_analysis: &report.ai_analysis,
        is_ai_verified: report.is_ai_verified(),
        status: report.status(),
        created_at: report.created_at,
        date: report.display_date(),
        city: &report.city,
    };
    into_document(&record)
}

/// Encode only the fields a patch sets
pub fn encode_patch(patch: &ReportPatch) -> Document {
    let mut doc = Document::new();
    if let Some(status) = patch.status {
        doc.insert("status".into(), Value::from(status.as_str()));
    }
    if let Some(confirmation) = patch.citizen_confirmation {
        doc.insert(
            "citizenConfirmation".into(),
            Value::from(confirmation.as_str()),
        );
    }
    if let Some(date) = patch.confirmation_date {
        doc.insert("confirmationDate".into(), Value::from(date.to_rfc3339()));
    }
    doc
}

fn into_document<T: Serialize>(value: &T) -> Document {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        // Records are plain structs of strings/numbers; anything else is empty
        _ => Document::new(),
    }
}

/// Every field any client version has written, all optional
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StoredRecord {
    email: Option<String>,
    citizen_name: Option<String>,
    category: Option<String>,
    problem: Option<String>,
    description: Option<String>,
    image: Option<String>,
    #[serde(rename = "imageURL")]
    image_url: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    priority: Option<String>,
    ai_analysis: Option<String>,
    is_ai_verified: Option<bool>,
    status: Option<String>,
    created_at: Option<Value>,
    date: Option<String>,
    citizen_confirmation: Option<String>,
    confirmation_date: Option<String>,
    city: Option<String>,
}

/// Decode a stored document into the canonical report shape
pub fn decode(id: &ReportId, doc: &Document) -> Result<Report, DocumentError> {
    let stored: StoredRecord =
        serde_json::from_value(Value::Object(doc.clone())).map_err(|source| {
            DocumentError::Shape {
                id: id.to_string(),
                source,
            }
        })?;

    let (category, legacy_category) = match stored
        .category
        .as_deref()
        .or(stored.problem.as_deref())
        .map(str::trim)
        .filter(|label| !label.is_empty())
    {
        Some(label) => match label.parse::<Category>() {
            Ok(category) => (category, None),
            Err(e) => {
                warn!(report = %id, error = %e, "unrecognised category, filing under Other");
                (Category::Other, Some(label.to_string()))
            }
        },
        None => (Category::Other, None),
    };

    let image = non_empty(stored.image).or_else(|| non_empty(stored.image_url));

    let location = match (stored.latitude, stored.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let priority = stored
        .priority
        .as_deref()
        .map(|p| {
            p.parse::<Priority>().unwrap_or_else(|e| {
                warn!(report = %id, error = %e, "unrecognised priority");
                Priority::default()
            })
        })
        .unwrap_or_default();

    let status = stored
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<ReportStatus>().unwrap_or_else(|e| {
                warn!(report = %id, error = %e, "unrecognised status, treating as Pending");
                ReportStatus::Pending
            })
        })
        .unwrap_or_default();

    let created_at = stored
        .created_at
        .as_ref()
        .and_then(parse_timestamp)
        .or_else(|| stored.date.as_deref().and_then(parse_display_date));

    Ok(Report {
        id: id.clone(),
        email: stored.email.unwrap_or_default(),
        citizen_name: stored.citizen_name.unwrap_or_default(),
        category,
        legacy_category,
        description: stored.description.unwrap_or_default(),
        image,
        location,
        priority,
        ai_analysis: stored.ai_analysis.unwrap_or_default(),
        is_ai_verified: stored.is_ai_verified.unwrap_or(false),
        status,
        created_at,
        date: stored.date,
        citizen_confirmation: stored
            .citizen_confirmation
            .as_deref()
            .and_then(|c| c.parse::<Confirmation>().ok()),
        confirmation_date: stored
            .confirmation_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc)),
        city: stored.city.unwrap_or_default(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// RFC 3339 strings, or `{ "seconds": .., "nanoseconds": .. }` server timestamps
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}

/// Legacy records only carry a `M/D/YYYY` display date
fn parse_display_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(date.trim(), "%m/%d/%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn as_doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn new_report() -> NewReport {
        NewReport {
            email: "asha@example.com".into(),
            citizen_name: "Asha".into(),
            category: Category::RoadDamage,
            description: "Pothole near the bus stop".into(),
            image: "data:image/jpeg;base64,AAAA".into(),
            location: Coordinates {
                latitude: 13.08,
                longitude: 80.27,
            },
            priority: Priority::High,
            ai_analysis: "Large pothole blocking lane".into(),
            city: "Chennai".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_report_uses_canonical_fields() {
        let doc = encode_new(&new_report());
        assert_eq!(doc["category"], "Road Damage");
        assert_eq!(doc["image"], "data:image/jpeg;base64,AAAA");
        assert_eq!(doc["status"], "Pending");
        assert_eq!(doc["isAiVerified"], true);
        assert_eq!(doc["date"], "01/15/2025");
        assert!(!doc.contains_key("problem"));
        assert!(!doc.contains_key("imageURL"));

        let id = ReportId::new("r1");
        let report = decode(&id, &doc).unwrap();
        assert_eq!(report.category, Category::RoadDamage);
        assert_eq!(report.priority, Priority::High);
        assert_eq!(report.created_at, Some(new_report().created_at));
        assert_eq!(report.location.unwrap().latitude, 13.08);
    }

    #[test]
    fn test_legacy_field_names() {
        let doc = as_doc(json!({
            "problem": "Garbage",
            "imageURL": "https://cdn.example.com/a.jpg",
            "priority": "Emergency",
            "date": "3/7/2024",
            "city": "Jaipur"
        }));
        let report = decode(&ReportId::new("old"), &doc).unwrap();
        assert_eq!(report.category, Category::Garbage);
        assert_eq!(report.image.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(report.priority, Priority::High);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(
            report.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap())
        );
        assert!(report.location.is_none());
    }

    #[test]
    fn test_unknown_category_keeps_its_label() {
        let doc = as_doc(json!({ "problem": "Street Light", "city": "Pune" }));
        let report = decode(&ReportId::new("sl"), &doc).unwrap();
        assert_eq!(report.category, Category::Other);
        assert_eq!(report.legacy_category.as_deref(), Some("Street Light"));
        assert_eq!(report.category_label(), "Street Light");

        let known = as_doc(json!({ "category": "Garbage" }));
        let report = decode(&ReportId::new("g"), &known).unwrap();
        assert!(report.legacy_category.is_none());
        assert_eq!(report.category_label(), "Garbage");
    }

    #[test]
    fn test_server_timestamp_object() {
        let doc = as_doc(json!({
            "category": "Electricity",
            "createdAt": { "seconds": 1_700_000_000, "nanoseconds": 0 }
        }));
        let report = decode(&ReportId::new("ts"), &doc).unwrap();
        assert_eq!(report.created_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_patch_only_sets_given_fields() {
        let patch = ReportPatch {
            status: Some(ReportStatus::ReOpened),
            citizen_confirmation: Some(Confirmation::NotFixed),
            confirmation_date: None,
        };
        let doc = encode_patch(&patch);
        assert_eq!(doc["status"], "Re-Opened");
        assert_eq!(doc["citizenConfirmation"], "Not Fixed");
        assert!(!doc.contains_key("confirmationDate"));
    }

    #[test]
    fn test_wrong_field_type_is_shape_error() {
        let doc = as_doc(json!({ "latitude": "north" }));
        assert!(decode(&ReportId::new("bad"), &doc).is_err());
    }
}
