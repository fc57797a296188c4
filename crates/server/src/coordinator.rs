//! The update coordinator: atomically replace a stored report definition and
//! reconcile its scheduled execution.
//!
//! Step order is a correctness contract, not an accident: the store replace
//! and the unschedule both commit before validation runs, so a rejected
//! update persists the new definition but never executes it. A later-stage
//! failure rolls nothing back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use dashpulse_core::{
    Dashboard, MissingEntity, Profile, Report, UpdateError, UpdateErrorKind,
};
use dashpulse_scheduler::{ReportScheduler, ScheduleKey};

use crate::parser;

/// Successful-update acknowledgment, echoing the request's correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub correlation_id: Uuid,
}

/// Orchestrates parse → locate → replace → cancel → validate →
/// compute-delay → stamp → arm for one report update.
#[derive(Clone)]
pub struct UpdateCoordinator {
    scheduler: Arc<ReportScheduler>,
}

impl UpdateCoordinator {
    pub fn new(scheduler: Arc<ReportScheduler>) -> Self {
        Self { scheduler }
    }

    /// Handle a raw update request body against the caller's profile.
    ///
    /// Resolution (dashboard, reporting widget) happens before the report
    /// definition is decoded; both are pure lookups with no side effects.
    pub async fn update_report(
        &self,
        profile: &mut Profile,
        owner: &str,
        body: &str,
        correlation_id: Uuid,
    ) -> Result<Ack, UpdateError> {
        let (dash_id, report_json) = parser::split_update_body(body, correlation_id)?;

        let dash = profile
            .dashboard_by_id_mut(dash_id)
            .ok_or_else(|| UpdateError::not_found(MissingEntity::Dashboard(dash_id), correlation_id))?;
        if dash.reporting.is_none() {
            return Err(UpdateError::not_found(
                MissingEntity::ReportingWidget(dash_id),
                correlation_id,
            ));
        }

        let report = parser::parse_report(report_json, correlation_id)?;
        self.apply(dash, owner, report, correlation_id).await
    }

    /// Apply a decoded report definition to a resolved dashboard.
    ///
    /// Strictly update-only: fails `NotFound` when no report with the given
    /// id exists, and never inserts one.
    pub async fn apply(
        &self,
        dash: &mut Dashboard,
        owner: &str,
        report: Report,
        correlation_id: Uuid,
    ) -> Result<Ack, UpdateError> {
        let now = Utc::now();
        let dash_id = dash.id;
        let report_id = report.id;
        let is_periodic = report.is_periodic();
        let key = ScheduleKey::new(owner, dash_id, report_id);

        // Locate, then replace copy-on-write. The replace commits before any
        // validation; concurrent readers of the prior snapshot keep a
        // consistent view.
        let index = {
            let widget = dash.reporting.as_mut().ok_or_else(|| {
                UpdateError::not_found(MissingEntity::ReportingWidget(dash_id), correlation_id)
            })?;
            let index = widget.report_index_by_id(report_id).ok_or_else(|| {
                UpdateError::not_found(MissingEntity::Report(report_id), correlation_id)
            })?;
            widget.replace_at(index, report.clone());
            index
        };
        dash.touch(now);

        // Always clear the previous schedule before any validation is done,
        // regardless of whether the new definition turns out valid.
        if is_periodic {
            let removed = self.scheduler.cancel(&key).await;
            debug!(key = %key, removed, "cleared previous schedule for report");
        }

        if !report.is_valid() {
            debug!(owner = %owner, report_id, "report is not valid");
            return Err(UpdateError::new(
                UpdateErrorKind::InvalidReport(report_id),
                correlation_id,
            ));
        }

        if is_periodic {
            let delay_seconds = report
                .recurrence
                .initial_delay_seconds(now)
                .map_err(|e| {
                    debug!(owner = %owner, report_id, error = %e, "report has wrong recurrence configuration");
                    UpdateError::new(e.into(), correlation_id)
                })?;

            let mut stamped = report;
            stamped.next_report_at = Some(now + chrono::Duration::seconds(delay_seconds as i64));
            if let Some(widget) = dash.reporting.as_mut() {
                widget.replace_at(index, stamped.clone());
            }

            if stamped.is_active {
                info!(owner = %owner, key = %key, delay_seconds, "arming periodic report");
                self.scheduler.schedule(key, stamped, delay_seconds).await;
            } else {
                debug!(owner = %owner, key = %key, "report is inactive; staying dormant");
            }
        }

        Ok(Ack { correlation_id })
    }
}
