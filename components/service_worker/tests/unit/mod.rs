//! Worker lifecycle scenarios against a scripted network.

use serde_json::json;
use service_worker::{EventOutcome, FetchOutcome, ServiceWorkerScope, WorkerConfig, WorkerEvent};
use std::sync::Arc;
use web_platform::fake::{FakeClients, FakeNetwork, RecordingRegistration};
use web_platform::{CacheStorage, Envelope, FetchRequest, ReplyPort, WorkerReply};

const ORIGIN: &str = "http://localhost:8000";

fn routed_network(config: &WorkerConfig) -> Arc<FakeNetwork> {
    let network = Arc::new(FakeNetwork::new());
    for resource in &config.local_resources {
        network.route(&format!("{ORIGIN}{resource}"), 200, resource.as_bytes());
    }
    for resource in &config.external_resources {
        network.route(resource, 200, b"external");
    }
    network
}

fn scope(config: WorkerConfig, storage: &Arc<CacheStorage>, network: &Arc<FakeNetwork>) -> ServiceWorkerScope {
    ServiceWorkerScope::new(
        config,
        Arc::clone(storage),
        network.clone(),
        Arc::new(RecordingRegistration::new(ORIGIN)),
        Arc::new(FakeClients::new()),
    )
    .unwrap()
}

mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_version_replaces_old_generation() {
        let storage = Arc::new(CacheStorage::new());
        let v1 = WorkerConfig::default();
        let network = routed_network(&v1);

        let old = scope(v1.clone(), &storage, &network);
        old.start().await.unwrap();
        old.cache().settle().await;
        assert_eq!(storage.keys(), vec!["pushbell-v1"]);

        let v2 = WorkerConfig {
            cache_name: "pushbell-v2".to_string(),
            ..v1
        };
        let new = scope(v2, &storage, &network);
        new.start().await.unwrap();

        assert_eq!(storage.keys(), vec!["pushbell-v2"]);
    }

    #[tokio::test]
    async fn test_manifest_resource_served_from_cache() {
        let storage = Arc::new(CacheStorage::new());
        let config = WorkerConfig::default();
        let network = routed_network(&config);
        let worker = scope(config, &storage, &network);
        worker.start().await.unwrap();

        let url = format!("{ORIGIN}/styles.css");
        for _ in 0..2 {
            let outcome = worker.dispatch(WorkerEvent::Fetch(FetchRequest::get(url.clone()))).await.unwrap();
            assert!(matches!(outcome, EventOutcome::Fetch(FetchOutcome::Respond(_))));
        }
        assert_eq!(network.request_count(&url), 1);
    }

    #[tokio::test]
    async fn test_relative_request_uses_same_key() {
        let storage = Arc::new(CacheStorage::new());
        let config = WorkerConfig::default();
        let network = routed_network(&config);
        let worker = scope(config, &storage, &network);
        worker.start().await.unwrap();

        let before = network.total_requests();
        let outcome = worker.cache().handle_fetch(&FetchRequest::get("/app.js")).await;
        assert_eq!(outcome.response().map(|r| r.status), Some(200));
        assert_eq!(network.total_requests(), before);
    }
}

mod message_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_reflects_current_generation() {
        let storage = Arc::new(CacheStorage::new());
        let config = WorkerConfig {
            external_resources: Vec::new(),
            ..WorkerConfig::default()
        };
        let network = routed_network(&config);
        let worker = scope(config, &storage, &network);
        worker.start().await.unwrap();

        let (port, receiver) = ReplyPort::channel();
        worker
            .dispatch(WorkerEvent::Message(Envelope {
                data: json!({"type": "GET_CACHE_STATUS"}),
                reply: Some(port),
            }))
            .await
            .unwrap();

        let WorkerReply::CacheStatus(status) = receiver.await.unwrap() else {
            panic!("expected cache status");
        };
        assert_eq!(status.name, "pushbell-v1");
        assert_eq!(status.size, 5);
        assert!(status.urls.contains(&format!("{ORIGIN}/index.html")));
    }

    #[tokio::test]
    async fn test_malformed_message_is_ignored() {
        let storage = Arc::new(CacheStorage::new());
        let config = WorkerConfig::default();
        let network = routed_network(&config);
        let worker = scope(config, &storage, &network);

        let outcome = worker
            .dispatch(WorkerEvent::Message(Envelope {
                data: json!({"kind": "GET_CACHE_STATUS"}),
                reply: None,
            }))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Done);
    }
}
