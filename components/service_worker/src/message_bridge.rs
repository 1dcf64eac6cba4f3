//! Worker side of the page/worker message protocol.
//!
//! `SHOW_NOTIFICATION` is fire-and-forget. `GET_CACHE_STATUS` and
//! `CLEAR_CACHE` answer exactly once on the reply port when the sender
//! supplied one. Unknown types are logged and dropped.

use std::sync::Arc;
use web_platform::{
    Envelope, MessageError, ReplyPort, ServiceWorkerRegistration, WorkerInbox, WorkerMessage,
    WorkerReply,
};

use crate::cache_manager::CacheManager;

/// Receives commands from the page.
pub struct MessageBridge {
    cache: Arc<CacheManager>,
    registration: Arc<dyn ServiceWorkerRegistration>,
}

impl MessageBridge {
    /// Bridge serving cache commands from `cache` and showing notifications
    /// through `registration`.
    pub fn new(cache: Arc<CacheManager>, registration: Arc<dyn ServiceWorkerRegistration>) -> Self {
        Self { cache, registration }
    }

    /// Handle one incoming message.
    ///
    /// Errors describe messages that were ignored; nothing is reported back
    /// to the sender.
    pub async fn handle(&self, envelope: Envelope) -> Result<(), MessageError> {
        let Envelope { data, reply } = envelope;
        let message = WorkerMessage::from_value(data)?;
        tracing::debug!(kind = message.type_name(), has_reply = reply.is_some(), "message received");

        match message {
            WorkerMessage::ShowNotification { title, options } => {
                match self.registration.show_notification(&title, &options).await {
                    Ok(()) => tracing::debug!(%title, "notification shown from message"),
                    Err(err) => tracing::error!(%title, error = %err, "failed to show notification from message"),
                }
            }
            WorkerMessage::GetCacheStatus => {
                answer(reply, WorkerReply::CacheStatus(self.cache.status()));
            }
            WorkerMessage::ClearCache => {
                self.cache.clear();
                answer(reply, WorkerReply::CacheCleared);
            }
        }
        Ok(())
    }

    /// Drain `inbox` until every sender is gone.
    pub async fn run(&self, mut inbox: WorkerInbox) {
        while let Some(envelope) = inbox.recv().await {
            if let Err(err) = self.handle(envelope).await {
                tracing::warn!(error = %err, "ignoring message");
            }
        }
    }
}

fn answer(port: Option<ReplyPort>, reply: WorkerReply) {
    if let Some(port) = port {
        if port.post(reply).is_err() {
            tracing::debug!("sender stopped waiting for reply");
        }
    }
}
