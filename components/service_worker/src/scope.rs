//! The worker's global scope: routes host events to their handlers.

use std::sync::Arc;
use web_platform::{
    CacheStorage, Clients, Envelope, FetchRequest, Network, NotificationHandle,
    ServiceWorkerRegistration, ServiceWorkerState, WorkerInbox,
};

use crate::cache_manager::{CacheManager, FetchOutcome, InstallReport};
use crate::config::WorkerConfig;
use crate::error::Result;
use crate::message_bridge::MessageBridge;
use crate::notification_events::{ClickOutcome, NotificationEvents};
use crate::push::PushNotification;

/// An event the host delivers to the worker.
#[derive(Debug)]
pub enum WorkerEvent {
    /// First run of this worker version
    Install,
    /// This version takes over from the previous one
    Activate,
    /// A request from a controlled page
    Fetch(FetchRequest),
    /// A push message with its optional payload
    Push(Option<Vec<u8>>),
    /// A click on a worker notification; `action` is empty for the body
    NotificationClick {
        /// The clicked notification
        notification: NotificationHandle,
        /// Action button id
        action: String,
    },
    /// A worker notification was dismissed
    NotificationClose(NotificationHandle),
    /// A message posted by a page
    Message(Envelope),
}

impl WorkerEvent {
    /// Host name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Push(_) => "push",
            WorkerEvent::NotificationClick { .. } => "notificationclick",
            WorkerEvent::NotificationClose(_) => "notificationclose",
            WorkerEvent::Message(_) => "message",
        }
    }
}

/// What handling an event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Install finished; activation should follow immediately
    Installed(InstallReport),
    /// Activation finished; these generations were deleted
    Activated(Vec<String>),
    /// The fetch decision
    Fetch(FetchOutcome),
    /// The push notification that was shown
    Push(PushNotification),
    /// The click result
    Click(ClickOutcome),
    /// Nothing to report
    Done,
}

/// One running worker.
pub struct ServiceWorkerScope {
    cache: Arc<CacheManager>,
    bridge: MessageBridge,
    events: NotificationEvents,
    registration: Arc<dyn ServiceWorkerRegistration>,
    clients: Arc<dyn Clients>,
}

impl ServiceWorkerScope {
    /// Start a worker for `config`.
    pub fn new(
        config: WorkerConfig,
        storage: Arc<CacheStorage>,
        network: Arc<dyn Network>,
        registration: Arc<dyn ServiceWorkerRegistration>,
        clients: Arc<dyn Clients>,
    ) -> Result<Self> {
        let cache = Arc::new(CacheManager::new(config.clone(), storage, network)?);
        let bridge = MessageBridge::new(Arc::clone(&cache), Arc::clone(&registration));
        let origin = cache.origin().clone();
        let events = NotificationEvents::new(config, origin, Arc::clone(&registration), Arc::clone(&clients));
        Ok(Self {
            cache,
            bridge,
            events,
            registration,
            clients,
        })
    }

    /// The cache manager.
    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// The click/close handler.
    pub fn notification_events(&self) -> &NotificationEvents {
        &self.events
    }

    /// Lifecycle state.
    pub fn state(&self) -> ServiceWorkerState {
        self.cache.state()
    }

    /// Install and activate without waiting for old clients to close.
    pub async fn start(&self) -> Result<InstallReport> {
        let report = match self.dispatch(WorkerEvent::Install).await? {
            EventOutcome::Installed(report) => report,
            _ => InstallReport::default(),
        };
        self.dispatch(WorkerEvent::Activate).await?;
        Ok(report)
    }

    /// Handle one host event.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome> {
        tracing::trace!(event = event.name(), "worker event");
        match event {
            WorkerEvent::Install => Ok(EventOutcome::Installed(self.cache.install().await?)),
            WorkerEvent::Activate => {
                let deleted = self.cache.activate().await?;
                if let Err(err) = self.clients.claim().await {
                    tracing::warn!(error = %err, "could not claim clients");
                }
                Ok(EventOutcome::Activated(deleted))
            }
            WorkerEvent::Fetch(request) => Ok(EventOutcome::Fetch(self.cache.handle_fetch(&request).await)),
            WorkerEvent::Push(payload) => {
                tracing::info!(bytes = payload.as_ref().map_or(0, Vec::len), "push received");
                let push = PushNotification::from_payload(payload.as_deref(), self.cache.config());
                push.show(self.registration.as_ref()).await?;
                Ok(EventOutcome::Push(push))
            }
            WorkerEvent::NotificationClick { notification, action } => Ok(EventOutcome::Click(
                self.events.handle_click(&notification, &action).await,
            )),
            WorkerEvent::NotificationClose(notification) => {
                self.events.handle_close(&notification);
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Message(envelope) => {
                if let Err(err) = self.bridge.handle(envelope).await {
                    tracing::warn!(error = %err, "ignoring message");
                }
                Ok(EventOutcome::Done)
            }
        }
    }

    /// Serve page messages until every sender is gone.
    pub async fn serve_messages(&self, inbox: WorkerInbox) {
        self.bridge.run(inbox).await;
    }
}
