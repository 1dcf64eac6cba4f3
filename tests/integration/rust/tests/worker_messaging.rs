//! Page-to-worker commands over the message channel.

use core_types::{CapabilitySet, NotificationOptions, PermissionState};
use integration_tests::{TestApp, ORIGIN};
use serde_json::json;
use web_platform::{WorkerMessage, WorkerReply};

#[tokio::test]
async fn test_cache_status_round_trip() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;

    let reply = app.messages.request(&WorkerMessage::GetCacheStatus).await.unwrap();

    let WorkerReply::CacheStatus(status) = reply else {
        panic!("expected cache status");
    };
    assert_eq!(status.name, "pushbell-v1");
    assert_eq!(status.size, 6);
    assert!(status.urls.contains(&format!("{ORIGIN}/notification-api.js")));
}

#[tokio::test]
async fn test_clear_cache_then_status_is_empty() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;

    let cleared = app.messages.request(&WorkerMessage::ClearCache).await.unwrap();
    assert_eq!(cleared, WorkerReply::CacheCleared);
    assert!(app.storage.keys().is_empty());

    let WorkerReply::CacheStatus(status) = app.messages.request(&WorkerMessage::GetCacheStatus).await.unwrap()
    else {
        panic!("expected cache status");
    };
    assert_eq!(status.size, 0);
}

#[tokio::test]
async fn test_show_notification_message_reaches_registration() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;

    app.messages.post_value(json!({"type": "UNKNOWN_THING"})).unwrap();
    app.messages
        .post(&WorkerMessage::ShowNotification {
            title: "From the page".to_string(),
            options: NotificationOptions::new().with_body("relayed"),
        })
        .unwrap();
    // A request after the posts completes only once they were handled.
    app.messages.request(&WorkerMessage::GetCacheStatus).await.unwrap();

    assert_eq!(app.registration.shown_titles(), vec!["From the page"]);
}
