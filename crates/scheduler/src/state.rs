//! Observable schedule state of a periodic report.

/// Where a report stands with respect to the schedule registry.
///
/// Transitions happen only through the update coordinator's path: an update
/// either arms a valid active report, leaves a valid inactive one dormant,
/// or tears the schedule down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    /// No live task and the report does not qualify for one.
    Unscheduled,
    /// Valid periodic report with `is_active = false`: carries a fresh
    /// `next_report_at` projection but no live task.
    Dormant,
    /// Live timer task registered for the report's key.
    Armed,
}
