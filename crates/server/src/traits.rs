use std::sync::Arc;

use async_trait::async_trait;

use crate::message::Envelope;

/// Handles one request envelope and produces the reply envelope.
///
/// The transport carrying the envelopes is outside this crate; anything that
/// can deliver an [`Envelope`] and ship one back can drive a handler.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: Envelope) -> Envelope;
}

/// Blanket implementation so `Arc<dyn RequestHandler>` can be used directly.
#[async_trait]
impl<T: RequestHandler + ?Sized> RequestHandler for Arc<T> {
    async fn handle(&self, request: Envelope) -> Envelope {
        (**self).handle(request).await
    }
}
