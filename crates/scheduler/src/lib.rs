//! Process-wide schedule registry for periodic reports.
//!
//! Maps `(owner, dashboard, report)` to at most one live timer task. The
//! only mutators are [`ReportScheduler::cancel`] and
//! [`ReportScheduler::schedule`]; both run under the registry lock, so a
//! cancel-then-arm for one key is a single logical transition and concurrent
//! sessions cannot double-arm the same key.

pub mod binding;
pub mod key;
pub mod state;

pub use binding::{FiredReport, ReportScheduler};
pub use key::ScheduleKey;
pub use state::ScheduleState;
