//! The [`Report`] entity: one stored report definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceConfig;

/// One data source a report aggregates: a widget-style selection of data
/// streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSource {
    /// Stream identifiers this source pulls from.
    pub data_streams: Vec<String>,
}

impl ReportSource {
    pub fn is_valid(&self) -> bool {
        !self.data_streams.is_empty()
    }
}

/// A stored report definition.
///
/// Built wholesale from an incoming definition on every update; a new
/// instance replaces the prior one with the same `id` entirely, so the value
/// is never mutated field-by-field once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Identity, unique within the owning reporting widget.
    pub id: u32,
    pub name: String,
    pub recurrence: RecurrenceConfig,
    /// Whether a valid periodic report is actually armed. A valid periodic
    /// report with `is_active = false` stays dormant.
    pub is_active: bool,
    pub recipients: Vec<String>,
    pub sources: Vec<ReportSource>,
    /// Projection of the next scheduled run. Meaningful only while the
    /// report is periodic and a schedule was computed; stale otherwise.
    #[serde(default)]
    pub next_report_at: Option<DateTime<Utc>>,
    /// Set by the execution side after a run; carried through updates.
    #[serde(default)]
    pub last_report_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_periodic(&self) -> bool {
        self.recurrence.is_periodic()
    }

    /// Domain validity of the whole definition. Derived, never stored.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.recipients.is_empty()
            && !self.sources.is_empty()
            && self.sources.iter().all(ReportSource::is_valid)
    }
}
