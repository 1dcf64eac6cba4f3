//! Unit tests for the web_platform public surface

use std::sync::Arc;
use web_platform::{
    CacheStorage, FetchRequest, FetchResponse, MessageClient, MessageError, Origin,
    ServiceWorkerState, WorkerMessage, WorkerReply,
};

#[cfg(test)]
mod generation_tests {
    use super::*;

    #[test]
    fn test_generations_are_independent() {
        let storage = CacheStorage::new();
        let old = storage.open("pushbell-v1");
        let new = storage.open("pushbell-v2");

        old.put_url("https://example.com/app.js", FetchResponse::new(200, b"v1".to_vec()))
            .unwrap();

        assert!(new.match_url("https://example.com/app.js").is_none());
        assert_eq!(storage.keys(), vec!["pushbell-v1", "pushbell-v2"]);
    }

    #[test]
    fn test_deleted_generation_handle_is_detached() {
        let storage = CacheStorage::new();
        let cache = storage.open("pushbell-v1");
        assert!(storage.delete("pushbell-v1"));

        // A fresh open yields an empty generation, not the deleted one.
        cache.put_url("https://example.com/", FetchResponse::new(200, vec![])).unwrap();
        let reopened = storage.open("pushbell-v1");
        assert!(!Arc::ptr_eq(&cache, &reopened));
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_cache_keys_from_relative_manifest() {
        let origin = Origin::parse("https://example.com").unwrap();
        let storage = CacheStorage::new();
        let cache = storage.open("v1");

        let request = FetchRequest::get(origin.resolve("/styles.css"));
        cache.put(&request, FetchResponse::new(200, b"body{}".to_vec())).unwrap();

        assert!(cache.match_url("https://example.com/styles.css").is_some());
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_full_lifecycle_path() {
        let path = [
            ServiceWorkerState::Parsed,
            ServiceWorkerState::Installing,
            ServiceWorkerState::Installed,
            ServiceWorkerState::Activating,
            ServiceWorkerState::Activated,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }
}

#[cfg(test)]
mod messaging_tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fire_and_forget_has_no_port() {
        let (client, mut inbox) = MessageClient::channel();
        client
            .post(&WorkerMessage::ShowNotification {
                title: "Hello".to_string(),
                options: Default::default(),
            })
            .unwrap();

        let envelope = inbox.recv().await.unwrap();
        assert!(envelope.reply.is_none());
        assert_eq!(envelope.data["type"], "SHOW_NOTIFICATION");
    }

    #[tokio::test]
    async fn test_raw_values_pass_through() {
        let (client, mut inbox) = MessageClient::channel();
        client.post_value(json!({"type": "PING"})).unwrap();

        let envelope = inbox.recv().await.unwrap();
        assert_eq!(
            WorkerMessage::from_value(envelope.data),
            Err(MessageError::UnknownType("PING".to_string()))
        );
    }

    #[tokio::test]
    async fn test_request_with_worker_gone() {
        let (client, inbox) = MessageClient::channel();
        drop(inbox);
        let result: Result<WorkerReply, _> = client.request(&WorkerMessage::ClearCache).await;
        assert_eq!(result, Err(MessageError::Disconnected));
    }
}
