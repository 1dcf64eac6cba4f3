//! Worker fetch handling offline, and notification click follow-up.

use core_types::{CapabilitySet, PermissionState};
use integration_tests::{TestApp, ORIGIN};
use service_worker::{EventOutcome, WindowOutcome, WorkerEvent};
use std::sync::Arc;
use std::time::Duration;
use web_platform::fake::FakeNotification;
use web_platform::{FetchRequest, NotificationHandle};

fn click(action: &str) -> (Arc<FakeNotification>, WorkerEvent) {
    let notification = Arc::new(FakeNotification::new("Pick one", Some("pushbell-actions")));
    let handle: NotificationHandle = notification.clone();
    (
        notification,
        WorkerEvent::NotificationClick {
            notification: handle,
            action: action.to_string(),
        },
    )
}

#[tokio::test]
async fn test_offline_navigation_served_from_cache() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;
    app.network.set_offline(true);

    let outcome = app
        .worker
        .dispatch(WorkerEvent::Fetch(FetchRequest::navigate(format!("{ORIGIN}/inbox"))))
        .await
        .unwrap();

    let EventOutcome::Fetch(fetch) = outcome else {
        panic!("expected fetch outcome");
    };
    assert_eq!(fetch.response().map(|r| r.body.clone()), Some(b"/".to_vec()));
}

#[tokio::test]
async fn test_cached_external_resource_survives_offline() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;
    app.network.set_offline(true);
    let external = app.worker.cache().config().external_resources[0].clone();

    let outcome = app.worker.cache().handle_fetch(&FetchRequest::get(external)).await;
    assert_eq!(outcome.response().map(|r| r.status), Some(200));
}

#[tokio::test(start_paused = true)]
async fn test_later_reminds_once_and_focuses_existing_window() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;
    app.clients.add_window("main", &format!("{ORIGIN}/"));

    let (notification, event) = click("later");
    let EventOutcome::Click(outcome) = app.worker.dispatch(event).await.unwrap() else {
        panic!("expected click outcome");
    };

    assert!(notification.is_closed());
    assert!(outcome.reminder_scheduled);
    assert!(matches!(outcome.window, WindowOutcome::Focused(_)));
    assert_eq!(app.clients.focused(), vec!["main"]);
    assert!(app.clients.opened().is_empty());

    tokio::time::sleep(Duration::from_secs(301)).await;
    assert_eq!(app.registration.shown_titles(), vec!["Reminder"]);
}

#[tokio::test]
async fn test_body_click_without_window_opens_app() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;

    let (_notification, event) = click("");
    app.worker.dispatch(event).await.unwrap();
    let (_notification, event) = click("yes");
    app.worker.dispatch(event).await.unwrap();

    assert_eq!(app.clients.opened(), vec![format!("{ORIGIN}/")]);
    assert_eq!(app.clients.focused(), vec!["window-1"]);
}
