//! End-to-end flows: capture, submit, admin action, citizen confirmation.

use async_trait::async_trait;
use image::{ImageBuffer, Rgb};
use std::io::Cursor;
use std::sync::Arc;

use civic_report::geo::{Coordinates, GeoError, Locator};
use civic_report::model::{Category, Confirmation, Priority, ReportStatus};
use civic_report::session::{ProfileForm, ProfileMessage, SessionContext, SessionStore};
use civic_report::store::{MemoryStore, ReportStore};
use civic_report::triage::{
    Classifier, ClassifierError, ClassifierRequest, TriageGate, FALLBACK_SUMMARY,
};
use civic_report::views::{AdminDashboard, CitizenDashboard, FacetFilter};
use civic_report::workflow::{submit, CaptureError, CapturePipeline, ReportDraft, SubmitError};

struct Answer(&'static str);

#[async_trait]
impl Classifier for Answer {
    async fn classify(&self, _request: &ClassifierRequest) -> Result<String, ClassifierError> {
        Ok(self.0.to_string())
    }
}

struct Offline;

#[async_trait]
impl Classifier for Offline {
    async fn classify(&self, _request: &ClassifierRequest) -> Result<String, ClassifierError> {
        Err(ClassifierError::Transport("connection refused".into()))
    }
}

struct Gps(Coordinates);

#[async_trait]
impl Locator for Gps {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

const CHENNAI: Coordinates = Coordinates {
    latitude: 13.0827,
    longitude: 80.2707,
};

fn photo() -> Vec<u8> {
    let img = ImageBuffer::from_fn(1000, 750, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 60]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn pipeline(classifier: impl Classifier + 'static) -> CapturePipeline {
    CapturePipeline::new(
        TriageGate::new(Arc::new(classifier)),
        Arc::new(Gps(CHENNAI)),
    )
}

/// A signed-in citizen with a completed profile
fn citizen_session() -> SessionContext {
    let mut session = SessionContext::load(SessionStore::open_in_memory().unwrap()).unwrap();
    session
        .save_citizen(civic_report::model::CitizenProfile {
            uid: "g-1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            ..Default::default()
        })
        .unwrap();
    let mut form = ProfileForm::open(&session).unwrap();
    form.update(ProfileMessage::FullNameChanged("Asha Raman".into()));
    form.update(ProfileMessage::PhoneChanged("9876543210".into()));
    form.update(ProfileMessage::CityChanged("Chennai".into()));
    form.save(&mut session, chrono::Utc::now()).unwrap();
    session
}

#[tokio::test]
async fn road_damage_with_high_priority_is_created_pending() {
    let store = Arc::new(MemoryStore::new());
    let session = citizen_session();
    let profile = session.require_complete_profile().unwrap();

    let capture = pipeline(Answer(
        "Sure! Here is my assessment:\n```json\n{\"matchesCategory\": true, \"priority\": \"High\", \"summary\": \"Large pothole blocking lane\"}\n```",
    ));
    let mut draft = ReportDraft::new();
    draft.select_category(Category::RoadDamage);
    draft.select_city("Chennai").unwrap();
    draft.set_description("Pothole on the main road");
    capture.capture_bytes(&mut draft, photo()).await.unwrap();

    let id = submit(&*store, &draft, profile).await.unwrap();

    let mut dashboard = CitizenDashboard::new(store.clone(), profile.email.clone());
    dashboard.refresh().await.unwrap();
    let report = &dashboard.reports()[0];
    assert_eq!(report.id, id);
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.priority, Priority::High);
    assert_eq!(report.ai_analysis, "Large pothole blocking lane");
    assert_eq!(report.citizen_name, "Asha Raman");
    assert_eq!(report.location, Some(CHENNAI));
    assert!(report.is_ai_verified);

    // Evidence is bounded to 800px on the longer edge
    let image = civic_report::imaging::EncodedImage::from_data_url(report.image.clone().unwrap())
        .unwrap()
        .decode()
        .unwrap();
    let decoded = image::load_from_memory(&image).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 600));
}

#[tokio::test]
async fn garbage_selfie_is_rejected_and_blocks_submission() {
    let store = MemoryStore::new();
    let session = citizen_session();
    let profile = session.require_complete_profile().unwrap();

    let capture = pipeline(Answer(
        r#"{"matchesCategory": false, "priority": "Low", "summary": "This is a selfie of a person."}"#,
    ));
    let mut draft = ReportDraft::new();
    draft.select_category(Category::Garbage);
    draft.select_city("Chennai").unwrap();
    draft.set_description("Garbage pile");

    let err = capture.capture_bytes(&mut draft, photo()).await.unwrap_err();
    assert!(matches!(err, CaptureError::Rejected { .. }));
    assert!(draft.evidence().is_none());
    assert!(!draft.is_ai_verified());

    let err = submit(&store, &draft, profile).await.unwrap_err();
    assert!(matches!(err, SubmitError::Incomplete(ref missing) if missing == &vec!["verified photo"]));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn code_screenshot_claimed_as_match_is_overridden() {
    let capture = pipeline(Answer(
        r#"{"matchesCategory": true, "priority": "High", "summary": "A screenshot of source code in an editor."}"#,
    ));
    let mut draft = ReportDraft::new();
    draft.select_category(Category::Electricity);

    let err = capture.capture_bytes(&mut draft, photo()).await.unwrap_err();
    assert!(
        matches!(err, CaptureError::Rejected { ref summary } if summary == "Invalid image content.")
    );
    assert!(!draft.is_ai_verified());
}

#[tokio::test]
async fn classifier_outage_fails_open_with_medium_priority() {
    let store = MemoryStore::new();
    let session = citizen_session();
    let profile = session.require_complete_profile().unwrap();

    let mut draft = ReportDraft::new();
    draft.select_category(Category::WaterSupply);
    draft.select_city("Chennai").unwrap();
    draft.set_description("Burst pipe");
    pipeline(Offline)
        .capture_bytes(&mut draft, photo())
        .await
        .unwrap();

    let evidence = draft.evidence().unwrap();
    assert!(evidence.degraded);

    submit(&store, &draft, profile).await.unwrap();
    let reports = store
        .query(&civic_report::store::ReportQuery::all())
        .await
        .unwrap();
    assert_eq!(reports[0].priority, Priority::Medium);
    assert_eq!(reports[0].ai_analysis, FALLBACK_SUMMARY);
    assert!(reports[0].is_ai_verified);
}

#[tokio::test]
async fn resolved_report_prompts_once_and_not_fixed_reopens() {
    let store = Arc::new(MemoryStore::new());
    let session = citizen_session();
    let profile = session.require_complete_profile().unwrap().clone();

    let mut draft = ReportDraft::new();
    draft.select_category(Category::RoadDamage);
    draft.select_city("Chennai").unwrap();
    draft.set_description("Pothole");
    pipeline(Answer(
        r#"{"matchesCategory": true, "priority": "Medium", "summary": "Pothole."}"#,
    ))
    .capture_bytes(&mut draft, photo())
    .await
    .unwrap();
    let id = submit(&*store, &draft, &profile).await.unwrap();

    let mut admin = AdminDashboard::open(store.clone());
    admin.refresh().await;
    admin.resolve(&id).await.unwrap();

    let mut citizen = CitizenDashboard::new(store.clone(), profile.email.clone());
    citizen.refresh().await.unwrap();
    assert_eq!(citizen.pending_confirmations().count(), 1);

    citizen.confirm(&id, Confirmation::NotFixed).await.unwrap();
    assert_eq!(citizen.pending_confirmations().count(), 0);

    // The admin's live view sees the re-opened report
    admin.catch_up().await;
    let report = admin.reports().iter().find(|r| r.id == id).unwrap();
    assert_eq!(report.status, ReportStatus::ReOpened);
    assert_eq!(report.citizen_confirmation, Some(Confirmation::NotFixed));
    assert!(report.confirmation_date.is_some());

    // A fresh load still shows no prompt
    citizen.refresh().await.unwrap();
    assert_eq!(citizen.pending_confirmations().count(), 0);
}

#[tokio::test]
async fn chennai_pending_filter_counts_only_the_filtered_set() {
    let store = Arc::new(MemoryStore::new());
    let session = citizen_session();
    let profile = session.require_complete_profile().unwrap().clone();

    for (city, answer) in [
        ("Chennai", r#"{"matchesCategory": true, "priority": "High", "summary": "a"}"#),
        ("Chennai", r#"{"matchesCategory": true, "priority": "Low", "summary": "b"}"#),
        ("Mumbai", r#"{"matchesCategory": true, "priority": "High", "summary": "c"}"#),
        ("Chennai", r#"{"matchesCategory": true, "priority": "Medium", "summary": "d"}"#),
    ] {
        let mut draft = ReportDraft::new();
        draft.select_category(Category::Garbage);
        draft.select_city(city).unwrap();
        draft.set_description("Uncollected garbage");
        pipeline(Answer(answer))
            .capture_bytes(&mut draft, photo())
            .await
            .unwrap();
        submit(&*store, &draft, &profile).await.unwrap();
    }

    let mut admin = AdminDashboard::open(store.clone());
    admin.refresh().await;
    let resolved = admin
        .reports()
        .iter()
        .find(|r| r.ai_analysis == "d")
        .map(|r| r.id.clone())
        .unwrap();
    admin.resolve(&resolved).await.unwrap();

    admin.set_filter(
        FacetFilter::default()
            .city("Chennai")
            .status(ReportStatus::Pending),
    );
    let view = admin.view();
    assert_eq!(view.reports.len(), 2);
    assert!(view
        .reports
        .iter()
        .all(|r| r.city == "Chennai" && r.status == ReportStatus::Pending));
    assert_eq!(view.stats.total, 2);
    assert_eq!(view.stats.pending, 2);
    assert_eq!(view.stats.resolved, 0);
    assert_eq!(view.stats.emergency, 1);
}
