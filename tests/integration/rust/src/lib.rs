//! Integration test suite for the notification page and its worker.
//!
//! [`TestApp`] wires a page-side dispatcher and a running worker over the
//! same scripted host: one cache store, one network, one registration.

use core_types::{CapabilitySet, PermissionState};
use notification_api::{DispatcherConfig, NotificationDispatcher};
use service_worker::{ServiceWorkerScope, WorkerConfig};
use std::sync::Arc;
use tokio::task::JoinHandle;
use web_platform::fake::{FakeClients, FakeNetwork, FakeNotificationHost, RecordingRegistration};
use web_platform::{CacheStorage, MessageClient, NotificationHost};

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use notification_api;
    pub use service_worker;
    pub use web_platform;
}

/// Origin every test app is served from.
pub const ORIGIN: &str = "http://localhost:8000";

/// A page and its worker sharing one scripted host.
pub struct TestApp {
    pub host: Arc<FakeNotificationHost>,
    pub registration: Arc<RecordingRegistration>,
    pub network: Arc<FakeNetwork>,
    pub clients: Arc<FakeClients>,
    pub storage: Arc<CacheStorage>,
    pub dispatcher: NotificationDispatcher,
    pub worker: Arc<ServiceWorkerScope>,
    pub messages: MessageClient,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Start the worker, then the page, with `permission` already decided.
    pub async fn start(capabilities: CapabilitySet, permission: PermissionState) -> Self {
        let config = WorkerConfig {
            origin: ORIGIN.to_string(),
            ..WorkerConfig::default()
        };

        let network = Arc::new(FakeNetwork::new());
        for resource in &config.local_resources {
            network.route(&format!("{ORIGIN}{resource}"), 200, resource.as_bytes());
        }
        for resource in &config.external_resources {
            network.route(resource, 200, b"external");
        }

        let registration = Arc::new(RecordingRegistration::new(&format!("{ORIGIN}/")));
        let clients = Arc::new(FakeClients::new());
        let storage = Arc::new(CacheStorage::new());

        let worker = Arc::new(
            ServiceWorkerScope::new(
                config,
                Arc::clone(&storage),
                network.clone(),
                registration.clone(),
                clients.clone(),
            )
            .expect("valid worker config"),
        );
        worker.start().await.expect("worker starts");
        worker.cache().settle().await;

        let (messages, inbox) = MessageClient::channel();
        let server = {
            let worker = Arc::clone(&worker);
            tokio::spawn(async move { worker.serve_messages(inbox).await })
        };

        let host = Arc::new(
            FakeNotificationHost::new(capabilities)
                .with_permission(permission)
                .with_registration(registration.clone()),
        );
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&host) as Arc<dyn NotificationHost>,
            DispatcherConfig::default(),
        );

        Self {
            host,
            registration,
            network,
            clients,
            storage,
            dispatcher,
            worker,
            messages,
            server,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}
