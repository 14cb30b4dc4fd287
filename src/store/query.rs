use std::cmp::Reverse;

use crate::model::Report;

/// Server-side query shape: equality on the reporter, newest-first, limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub email: Option<String>,
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl ReportQuery {
    /// Every report, in store order
    pub fn all() -> Self {
        Self::default()
    }

    /// Reports filed by one citizen
    pub fn by_reporter(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.email
            .as_deref()
            .map_or(true, |email| report.is_owned_by(email))
    }

    /// Evaluate the query against a full collection snapshot
    pub fn apply<'a, I>(&self, reports: I) -> Vec<Report>
    where
        I: IntoIterator<Item = &'a Report>,
    {
        let mut selected: Vec<Report> = reports
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        if self.newest_first {
            // Records without a timestamp sort last
            selected.sort_by_key(|r| Reverse(r.created_at));
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
