//! [`ReportScheduler`] — timer registry keyed by [`ScheduleKey`].
//!
//! Each armed report is one spawned sleep task. When the timer fires, the
//! task removes its own registry entry and hands the full report definition
//! to the execution side through an mpsc channel; the heavier report work
//! happens there, outside this crate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use dashpulse_core::Report;

use crate::key::ScheduleKey;
use crate::state::ScheduleState;

/// A report whose timer elapsed, handed off for execution.
#[derive(Debug, Clone)]
pub struct FiredReport {
    pub key: ScheduleKey,
    pub report: Report,
    pub fired_at: DateTime<Utc>,
}

/// One live timer in the registry.
struct TimerTask {
    handle: JoinHandle<()>,
    fire_at: DateTime<Utc>,
}

/// Concurrency-safe registry from [`ScheduleKey`] to at most one live timer.
///
/// All mutations go through the single registry lock, which serializes
/// cancel/schedule for every key across sessions.
pub struct ReportScheduler {
    tasks: Mutex<HashMap<ScheduleKey, TimerTask>>,
    fired_tx: mpsc::Sender<FiredReport>,
}

impl ReportScheduler {
    /// Create the scheduler and the receiving end of the fired-report
    /// handoff channel.
    pub fn new(fired_queue_capacity: usize) -> (Arc<Self>, mpsc::Receiver<FiredReport>) {
        let (fired_tx, fired_rx) = mpsc::channel(fired_queue_capacity);
        let scheduler = Arc::new(Self {
            tasks: Mutex::new(HashMap::new()),
            fired_tx,
        });
        (scheduler, fired_rx)
    }

    /// Cancel the live timer for `key`, if any. Idempotent: absence of a
    /// prior schedule is not an error.
    ///
    /// Returns whether something was actually cancelled.
    pub async fn cancel(&self, key: &ScheduleKey) -> bool {
        let mut tasks = self.tasks.lock().await;
        match tasks.remove(key) {
            Some(task) => {
                task.handle.abort();
                debug!(key = %key, "cancelled scheduled report");
                true
            }
            None => false,
        }
    }

    /// Register exactly one future execution for `key`, firing after
    /// `delay_seconds` and carrying the full report definition.
    ///
    /// An existing timer for the same key is aborted under the same lock
    /// before the new one is inserted, so two racing schedules for one key
    /// collapse to a single live task.
    pub async fn schedule(self: &Arc<Self>, key: ScheduleKey, report: Report, delay_seconds: u64) {
        let mut tasks = self.tasks.lock().await;

        if let Some(prev) = tasks.remove(&key) {
            prev.handle.abort();
            warn!(key = %key, "replacing an already-armed schedule");
        }

        let fire_at = Utc::now() + chrono::Duration::seconds(delay_seconds as i64);
        let registry = Arc::downgrade(self);
        let fired_tx = self.fired_tx.clone();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_seconds)).await;

            if let Some(scheduler) = registry.upgrade() {
                scheduler.tasks.lock().await.remove(&task_key);
            }

            let fired = FiredReport {
                key: task_key,
                report,
                fired_at: Utc::now(),
            };
            if fired_tx.send(fired).await.is_err() {
                warn!("fired-report channel closed; dropping report run");
            }
        });

        info!(key = %key, delay_seconds, fire_at = %fire_at, "armed scheduled report");
        tasks.insert(key, TimerTask { handle, fire_at });
    }

    /// Whether a live timer exists for `key`.
    pub async fn is_armed(&self, key: &ScheduleKey) -> bool {
        self.tasks.lock().await.contains_key(key)
    }

    /// When the live timer for `key` will fire, if one exists.
    pub async fn fire_at(&self, key: &ScheduleKey) -> Option<DateTime<Utc>> {
        self.tasks.lock().await.get(key).map(|t| t.fire_at)
    }

    /// Observable state of `report` with respect to this registry.
    pub async fn state_of(&self, key: &ScheduleKey, report: &Report) -> ScheduleState {
        if self.is_armed(key).await {
            ScheduleState::Armed
        } else if report.is_periodic() && report.is_valid() && !report.is_active {
            ScheduleState::Dormant
        } else {
            ScheduleState::Unscheduled
        }
    }

    /// Number of live timers.
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}
