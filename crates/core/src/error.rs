use thiserror::Error;
use uuid::Uuid;

use crate::recurrence::RecurrenceError;

/// Which referenced entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Dashboard(u32),
    ReportingWidget(u32),
    Report(u32),
}

impl std::fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingEntity::Dashboard(id) => write!(f, "dashboard {}", id),
            MissingEntity::ReportingWidget(dash_id) => {
                write!(f, "reporting widget on dashboard {}", dash_id)
            }
            MissingEntity::Report(id) => write!(f, "report {}", id),
        }
    }
}

/// Failure modes of the report-update protocol.
///
/// All of these are recoverable-to-the-caller: they terminate the current
/// request only, never the session or the process.
#[derive(Debug, Error)]
pub enum UpdateErrorKind {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("not found: {0}")]
    NotFound(MissingEntity),

    #[error("report {0} is not valid")]
    InvalidReport(u32),

    #[error("bad recurrence config: {0}")]
    BadRecurrenceConfig(#[from] RecurrenceError),
}

/// An update failure tagged with the correlation id of the triggering
/// request, so the caller can match the error back to what it sent.
#[derive(Debug, Error)]
#[error("{kind} (correlation_id: {correlation_id})")]
pub struct UpdateError {
    pub kind: UpdateErrorKind,
    pub correlation_id: Uuid,
}

impl UpdateError {
    pub fn new(kind: UpdateErrorKind, correlation_id: Uuid) -> Self {
        Self {
            kind,
            correlation_id,
        }
    }

    pub fn malformed(reason: impl Into<String>, correlation_id: Uuid) -> Self {
        Self::new(UpdateErrorKind::MalformedRequest(reason.into()), correlation_id)
    }

    pub fn not_found(entity: MissingEntity, correlation_id: Uuid) -> Self {
        Self::new(UpdateErrorKind::NotFound(entity), correlation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_error_display_includes_correlation_id() {
        let cid = Uuid::new_v4();
        let err = UpdateError::not_found(MissingEntity::Dashboard(3), cid);
        let rendered = err.to_string();
        assert!(rendered.contains("dashboard 3"));
        assert!(rendered.contains(&cid.to_string()));
    }

    #[test]
    fn recurrence_error_converts_to_kind() {
        let kind: UpdateErrorKind = RecurrenceError::NotPeriodic.into();
        assert!(matches!(kind, UpdateErrorKind::BadRecurrenceConfig(_)));
    }
}
