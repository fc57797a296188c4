//! Wire-format envelope for request/reply exchanges.
//!
//! The envelope is transport-agnostic: whatever carries the bytes, a reply
//! is matched to its request by `correlation_id`. Bodies are opaque text;
//! splitting them into fields is the parser's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topics used by the report-update exchange.
pub mod topics {
    pub const REPORT_UPDATE: &str = "report.update";
    pub const REPORT_UPDATE_OK: &str = "report.update.ok";
    pub const REPORT_UPDATE_ERR: &str = "report.update.err";
}

/// One request or reply on the wire, MessagePack-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Routing topic (e.g. "report.update").
    pub topic: String,

    /// Ties a reply or error back to the triggering request.
    pub correlation_id: Uuid,

    pub sent_at: DateTime<Utc>,

    /// Opaque text body; field layout is protocol-specific.
    pub body: String,
}

impl Envelope {
    /// Create a fresh request with a new correlation id.
    pub fn request(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            correlation_id: Uuid::new_v4(),
            sent_at: Utc::now(),
            body: body.into(),
        }
    }

    /// Create a reply echoing the request's correlation id.
    pub fn reply(
        topic: impl Into<String>,
        body: impl Into<String>,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            topic: topic.into(),
            correlation_id,
            sent_at: Utc::now(),
            body: body.into(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}
