use serde::Serialize;

use crate::model::{Category, Priority, Report, ReportStatus};

/// One filter dimension: everything, or one exact value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

/// Conjunction of the city, status and category facets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetFilter {
    pub city: Facet<String>,
    pub status: Facet<ReportStatus>,
    pub category: Facet<Category>,
}

impl FacetFilter {
    pub fn city(mut self, name: impl Into<String>) -> Self {
        self.city = Facet::Only(name.into());
        self
    }

    pub fn status(mut self, status: ReportStatus) -> Self {
        self.status = Facet::Only(status);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Facet::Only(category);
        self
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.city.admits(&report.city)
            && self.status.admits(&report.status)
            && self.category.admits(&report.category)
    }

    /// Filter and count in one pass so the two never disagree
    pub fn apply(&self, reports: &[Report]) -> Filtered {
        let reports: Vec<Report> = reports.iter().filter(|r| self.matches(r)).cloned().collect();
        let stats = ReportStats::tally(&reports);
        Filtered { reports, stats }
    }
}

/// Headline counters for a set of reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    /// High-priority reports (shown as "emergency" on the admin dashboard)
    pub emergency: usize,
}

impl ReportStats {
    pub fn tally<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        reports.into_iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status {
                ReportStatus::Pending => stats.pending += 1,
                ReportStatus::Resolved => stats.resolved += 1,
                _ => {}
            }
            if r.priority == Priority::High {
                stats.emergency += 1;
            }
            stats
        })
    }
}

/// A filtered slice with counters computed over exactly that slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    pub reports: Vec<Report>,
    pub stats: ReportStats,
}
