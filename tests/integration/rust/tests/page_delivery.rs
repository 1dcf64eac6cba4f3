//! Page-side delivery paths with a live worker behind them.

use core_types::{CapabilitySet, HostStrategy, NotificationOptions, PermissionState};
use integration_tests::TestApp;
use notification_api::Delivery;

#[tokio::test]
async fn test_granted_full_host_uses_worker_for_actions() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;
    let _watch = app.dispatcher.initialize().await;

    let delivery = app.dispatcher.show_actions("Pick one", NotificationOptions::new()).await;

    let Delivery::Worker { options, .. } = delivery else {
        panic!("expected worker delivery");
    };
    assert_eq!(options.actions.map(|a| a.len()), Some(3));
    assert_eq!(app.registration.shown_titles(), vec!["Pick one"]);
}

#[tokio::test]
async fn test_basic_kind_goes_direct_even_with_worker() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Granted).await;
    let _watch = app.dispatcher.initialize().await;

    let delivery = app.dispatcher.show_basic("Ping", NotificationOptions::new()).await;

    assert!(delivery.native().is_some());
    assert!(app.registration.shown().is_empty());
}

#[tokio::test]
async fn test_default_permission_with_persistent_actions_falls_back() {
    let app = TestApp::start(CapabilitySet::full(), PermissionState::Default).await;
    let _watch = app.dispatcher.initialize().await;

    let delivery = app.dispatcher.show_actions("Pick one", NotificationOptions::new()).await;

    assert!(delivery.is_fallback());
    assert!(app.registration.shown().is_empty());
}

#[tokio::test]
async fn test_legacy_host_prompts_once_then_delivers() {
    let capabilities = CapabilitySet {
        persistent: false,
        actions: false,
        host_strategy: HostStrategy::LegacyCallback,
        ..CapabilitySet::full()
    };
    let app = TestApp::start(capabilities, PermissionState::Default).await;

    assert_eq!(app.dispatcher.request_permission().await, Ok(PermissionState::Granted));
    assert_eq!(app.dispatcher.request_permission().await, Ok(PermissionState::Granted));
    assert_eq!(app.host.prompt_count(), 1);

    let delivery = app.dispatcher.show_actions("Pick one", NotificationOptions::new()).await;
    assert!(delivery.native().is_some());
    assert!(app.host.shown()[0].1.actions.is_none());
}
