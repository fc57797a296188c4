//! Per-caller session: sequential request handling over a channel seam.
//!
//! Each session processes its own caller's requests one at a time; many
//! sessions run concurrently and share one schedule registry. A failed
//! request produces an error reply on that session only; nothing terminates
//! the session or the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use dashpulse_core::{Profile, UpdateErrorKind};
use dashpulse_scheduler::ReportScheduler;

use crate::coordinator::UpdateCoordinator;
use crate::message::{topics, Envelope};
use crate::parser::BODY_SEPARATOR;
use crate::traits::RequestHandler;

/// Stable machine-readable code for an error reply body.
fn error_code(kind: &UpdateErrorKind) -> &'static str {
    match kind {
        UpdateErrorKind::MalformedRequest(_) => "malformed_request",
        UpdateErrorKind::NotFound(_) => "not_found",
        UpdateErrorKind::InvalidReport(_) => "invalid_report",
        UpdateErrorKind::BadRecurrenceConfig(_) => "bad_recurrence_config",
    }
}

/// One caller's session.
pub struct Session {
    owner: String,
    profile: Arc<RwLock<Profile>>,
    coordinator: UpdateCoordinator,
}

impl Session {
    pub fn new(
        owner: impl Into<String>,
        profile: Arc<RwLock<Profile>>,
        scheduler: Arc<ReportScheduler>,
    ) -> Self {
        Self {
            owner: owner.into(),
            profile,
            coordinator: UpdateCoordinator::new(scheduler),
        }
    }

    /// Drain requests from `rx` sequentially, sending each reply on `tx`.
    /// Ends when either side of the transport closes.
    pub async fn run(&self, mut rx: mpsc::Receiver<Envelope>, tx: mpsc::Sender<Envelope>) {
        while let Some(request) = rx.recv().await {
            let reply = self.handle(request).await;
            if tx.send(reply).await.is_err() {
                debug!(owner = %self.owner, "session reply channel closed");
                break;
            }
        }
    }

    async fn handle_update(&self, request: Envelope) -> Envelope {
        let correlation_id = request.correlation_id;
        let mut profile = self.profile.write().await;

        match self
            .coordinator
            .update_report(&mut profile, &self.owner, &request.body, correlation_id)
            .await
        {
            Ok(ack) => Envelope::reply(topics::REPORT_UPDATE_OK, "", ack.correlation_id),
            Err(e) => {
                debug!(owner = %self.owner, error = %e, "report update failed");
                let body = format!("{}{}{}", error_code(&e.kind), BODY_SEPARATOR, e.kind);
                Envelope::reply(topics::REPORT_UPDATE_ERR, body, e.correlation_id)
            }
        }
    }
}

#[async_trait]
impl RequestHandler for Session {
    async fn handle(&self, request: Envelope) -> Envelope {
        match request.topic.as_str() {
            topics::REPORT_UPDATE => self.handle_update(request).await,
            other => {
                warn!(owner = %self.owner, topic = %other, "unexpected request topic");
                let body = format!(
                    "malformed_request{}unknown topic: {}",
                    BODY_SEPARATOR, other
                );
                Envelope::reply(topics::REPORT_UPDATE_ERR, body, request.correlation_id)
            }
        }
    }
}
