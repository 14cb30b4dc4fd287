//! Public issue map
//!
//! Everyone sees the same live set of reports, narrowed by city and
//! category. Picking a city recentres the map on it; picking "All" goes back
//! to the national view.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::filter::Facet;
use super::ViewError;
use crate::geo::Coordinates;
use crate::model::{
    Category, City, Priority, Report, ReportId, ReportStatus, Viewport, NATIONAL_VIEW,
};
use crate::store::{ReportQuery, ReportStore, Subscription};

/// Most reports the public map loads at once
pub const DEFAULT_MAP_LIMIT: usize = 10_000;

/// One pin on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: ReportId,
    pub position: Coordinates,
    pub color: &'static str,
    pub category: Category,
    /// Display label, which keeps unrecognised legacy categories visible
    pub label: String,
    pub status: ReportStatus,
    pub priority: Priority,
    pub description: String,
    pub city: String,
}

impl Marker {
    fn from_report(report: &Report) -> Option<Self> {
        let position = report.location?;
        Some(Self {
            id: report.id.clone(),
            position,
            color: report.category.marker_color(),
            category: report.category,
            label: report.category_label().to_string(),
            status: report.status,
            priority: report.priority,
            description: report.description.clone(),
            city: report.city.clone(),
        })
    }
}

pub struct PublicMap {
    subscription: Subscription,
    reports: Vec<Report>,
    city: Facet<&'static City>,
    category: Facet<Category>,
    viewport: Viewport,
}

impl PublicMap {
    pub fn open(store: &Arc<dyn ReportStore>, limit: usize) -> Self {
        Self {
            subscription: store.subscribe(ReportQuery::all().limit(limit)),
            reports: Vec::new(),
            city: Facet::All,
            category: Facet::All,
            viewport: NATIONAL_VIEW,
        }
    }

    /// Wait for the next snapshot; `false` once the store has gone away
    pub async fn refresh(&mut self) -> bool {
        match self.subscription.next_snapshot().await {
            Some(snapshot) => {
                debug!(reports = snapshot.len(), "map snapshot");
                self.reports = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Narrow to one city (or `None` for all) and recentre the map
    pub fn select_city(&mut self, name: Option<&str>) -> Result<Viewport, ViewError> {
        match name {
            None => {
                self.city = Facet::All;
                self.viewport = NATIONAL_VIEW;
            }
            Some(name) => {
                let city =
                    City::by_name(name).ok_or_else(|| ViewError::UnknownCity(name.to_string()))?;
                self.city = Facet::Only(city);
                self.viewport = city.viewport();
            }
        }
        Ok(self.viewport)
    }

    pub fn select_category(&mut self, category: Facet<Category>) {
        self.category = category;
    }

    fn admits(&self, report: &Report) -> bool {
        let in_city = match self.city {
            Facet::All => true,
            Facet::Only(city) => report.city == city.name,
        };
        in_city && self.category.admits(&report.category)
    }

    /// Pins for the reports in view; reports without a position are skipped
    pub fn markers(&self) -> Vec<Marker> {
        self.reports
            .iter()
            .filter(|r| self.admits(r))
            .filter_map(Marker::from_report)
            .collect()
    }

    pub fn close(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use crate::views::filter::tests::report;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> Arc<dyn ReportStore> {
        let store = MemoryStore::new();
        store
            .insert_document(
                ReportId::new("a"),
                document(json!({
                    "category": "Road Damage", "city": "Chennai",
                    "latitude": 13.08, "longitude": 80.27,
                })),
            )
            .await;
        store
            .insert_document(
                ReportId::new("b"),
                document(json!({
                    "problem": "Garbage", "city": "Chennai",
                    "latitude": 13.05, "longitude": 80.25,
                })),
            )
            .await;
        store
            .insert_document(
                ReportId::new("c"),
                document(json!({
                    "category": "Water Supply", "city": "Delhi",
                    "latitude": 28.61, "longitude": 77.2,
                })),
            )
            .await;
        // No coordinates: listed on dashboards, never pinned
        store
            .insert_document(
                ReportId::new("d"),
                document(json!({ "category": "Garbage", "city": "Chennai" })),
            )
            .await;
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_city_selection_recentres() {
        let store = seeded().await;
        let mut map = PublicMap::open(&store, DEFAULT_MAP_LIMIT);
        assert_eq!(map.viewport(), NATIONAL_VIEW);

        let view = map.select_city(Some("Jaipur")).unwrap();
        assert_eq!(view.zoom, 13);
        assert_eq!(view.center.latitude, 26.9124);

        assert_eq!(map.select_city(None).unwrap(), NATIONAL_VIEW);
        assert!(matches!(
            map.select_city(Some("Gotham")),
            Err(ViewError::UnknownCity(_))
        ));
        assert_eq!(map.viewport(), NATIONAL_VIEW);
    }

    #[tokio::test]
    async fn test_markers_follow_facets_and_colours() {
        let store = seeded().await;
        let mut map = PublicMap::open(&store, DEFAULT_MAP_LIMIT);
        map.refresh().await;
        assert_eq!(map.markers().len(), 3);

        map.select_city(Some("Chennai")).unwrap();
        let markers = map.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].color, "#EA4335");
        assert_eq!(markers[1].color, "#FBBC04");
        assert_eq!(markers[1].label, "Garbage");

        map.select_category(Facet::Only(Category::Garbage));
        let markers = map.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, ReportId::new("b"));
    }

    #[tokio::test]
    async fn test_limit_caps_the_snapshot() {
        let store = seeded().await;
        let mut map = PublicMap::open(&store, 2);
        map.refresh().await;
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn test_marker_needs_a_position() {
        let r = report(
            "x",
            "Pune",
            ReportStatus::Pending,
            Category::Other,
            Priority::Low,
        );
        assert!(Marker::from_report(&r).is_none());
    }
}
