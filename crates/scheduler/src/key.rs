//! Composite identity of one scheduled report execution.

/// Registry key: one live task at most per `(owner, dashboard, report)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    /// Caller identity (account email).
    pub owner: String,
    pub dash_id: u32,
    pub report_id: u32,
}

impl ScheduleKey {
    pub fn new(owner: impl Into<String>, dash_id: u32, report_id: u32) -> Self {
        Self {
            owner: owner.into(),
            dash_id,
            report_id,
        }
    }
}

impl std::fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.dash_id, self.report_id)
    }
}
