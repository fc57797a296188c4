//! Per-dashboard report storage: profile → dashboard → reporting widget.
//!
//! The reporting widget keeps its reports behind a single `Arc<Vec<Report>>`.
//! A replace builds a fresh vector and swaps that one reference, so a
//! concurrent reader holding the prior snapshot keeps seeing the old,
//! consistent sequence; no reader ever observes a partially-updated
//! collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::report::Report;

/// The dashboard-level container owning a collection of reports.
///
/// Invariant: at most one report per id.
#[derive(Debug, Clone)]
pub struct ReportingWidget {
    reports: Arc<Vec<Report>>,
}

impl ReportingWidget {
    pub fn new(reports: Vec<Report>) -> Self {
        Self {
            reports: Arc::new(reports),
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Cheap consistent snapshot for concurrent readers.
    pub fn snapshot(&self) -> Arc<Vec<Report>> {
        Arc::clone(&self.reports)
    }

    /// Index of the report with the given id, if present.
    pub fn report_index_by_id(&self, id: u32) -> Option<usize> {
        self.reports.iter().position(|r| r.id == id)
    }

    /// Copy-on-write replace of the element at `index`.
    ///
    /// Builds a new vector with only that element swapped, preserving order,
    /// then replaces the shared reference.
    pub fn replace_at(&mut self, index: usize, report: Report) {
        let mut next: Vec<Report> = self.reports.as_ref().clone();
        next[index] = report;
        self.reports = Arc::new(next);
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub id: u32,
    pub name: String,
    /// Advances whenever a structural change to the dashboard commits.
    pub updated_at: DateTime<Utc>,
    pub reporting: Option<ReportingWidget>,
}

impl Dashboard {
    pub fn new(id: u32, name: impl Into<String>, reporting: Option<ReportingWidget>) -> Self {
        Self {
            id,
            name: name.into(),
            updated_at: Utc::now(),
            reporting,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// One caller's dashboards.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub dashboards: Vec<Dashboard>,
}

impl Profile {
    pub fn new(dashboards: Vec<Dashboard>) -> Self {
        Self { dashboards }
    }

    pub fn dashboard_by_id(&self, id: u32) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id == id)
    }

    pub fn dashboard_by_id_mut(&mut self, id: u32) -> Option<&mut Dashboard> {
        self.dashboards.iter_mut().find(|d| d.id == id)
    }
}
