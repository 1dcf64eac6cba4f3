//! Foreground dispatcher behaviour against scripted hosts.

use core_types::{CapabilitySet, NotificationOptions, NotifyError, PermissionState};
use notification_api::{Delivery, DispatcherConfig, NotificationDispatcher, NotificationKind, FALLBACK_TTL};
use std::sync::Arc;
use std::time::Duration;
use web_platform::fake::{FakeNotificationHost, RecordingRegistration};
use web_platform::NotificationHost;

fn dispatcher_over(host: &Arc<FakeNotificationHost>) -> NotificationDispatcher {
    NotificationDispatcher::new(Arc::clone(host) as Arc<dyn NotificationHost>, DispatcherConfig::default())
}

const KINDS: [NotificationKind; 4] = [
    NotificationKind::Basic,
    NotificationKind::Rich,
    NotificationKind::Actions,
    NotificationKind::Custom,
];

mod degradation_tests {
    use super::*;

    #[tokio::test]
    async fn test_every_kind_degrades_when_denied() {
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::full()).with_permission(PermissionState::Denied));
        let dispatcher = dispatcher_over(&host);

        for kind in KINDS {
            let delivery = dispatcher.show(kind, "t", NotificationOptions::new()).await;
            assert!(delivery.is_fallback(), "{kind} should degrade");
        }
        assert_eq!(dispatcher.fallback().len(), KINDS.len());
    }

    #[tokio::test]
    async fn test_every_kind_degrades_when_host_throws() {
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::full()).with_permission(PermissionState::Granted));
        host.set_show_failing(true);
        let dispatcher = dispatcher_over(&host);

        for kind in KINDS {
            assert!(dispatcher.show(kind, "t", NotificationOptions::new()).await.is_fallback());
        }
    }

    #[tokio::test]
    async fn test_unsupported_host_only_rejects_permission_request() {
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::none()));
        let dispatcher = dispatcher_over(&host);

        assert_eq!(dispatcher.request_permission().await, Err(NotifyError::Unsupported));
        assert!(dispatcher.show_basic("t", NotificationOptions::new()).await.is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_entries_expire() {
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::none()));
        let dispatcher = dispatcher_over(&host);

        dispatcher.show_basic("first", NotificationOptions::new()).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        dispatcher.show_basic("second", NotificationOptions::new()).await;

        tokio::time::sleep(FALLBACK_TTL - Duration::from_secs(2) + Duration::from_millis(1)).await;
        let titles: Vec<_> = dispatcher.fallback().entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["second"]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(dispatcher.fallback().is_empty());
    }
}

mod permission_tests {
    use super::*;

    #[tokio::test]
    async fn test_second_request_does_not_prompt() {
        for answer in [PermissionState::Granted, PermissionState::Denied] {
            let host = Arc::new(FakeNotificationHost::new(CapabilitySet::full()).with_prompt_answer(answer));
            let dispatcher = dispatcher_over(&host);

            assert_eq!(dispatcher.request_permission().await, Ok(answer));
            assert_eq!(dispatcher.request_permission().await, Ok(answer));
            assert_eq!(host.prompt_count(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_band_revoke_switches_to_fallback() {
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::full()).with_permission(PermissionState::Granted));
        let dispatcher = dispatcher_over(&host);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.hooks().on_permission_change(move |state| sink.lock().push(state));
        let _watch = dispatcher.initialize().await;

        assert!(matches!(
            dispatcher.show_basic("before", NotificationOptions::new()).await,
            Delivery::Native(_)
        ));

        host.set_permission(PermissionState::Default);
        assert!(dispatcher.show_basic("after", NotificationOptions::new()).await.is_fallback());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*seen.lock(), vec![PermissionState::Default]);
    }

    #[tokio::test]
    async fn test_default_permission_with_worker_still_falls_back() {
        let registration = Arc::new(RecordingRegistration::new("https://app.test/"));
        let host = Arc::new(FakeNotificationHost::new(CapabilitySet::full()).with_registration(registration.clone()));
        let dispatcher = dispatcher_over(&host);
        let _watch = dispatcher.initialize().await;

        assert!(dispatcher.show_actions("t", NotificationOptions::new()).await.is_fallback());
        assert!(registration.shown().is_empty());
    }
}
