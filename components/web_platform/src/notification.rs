//! Host notification primitives.
//!
//! Host notification objects are opaque handles. Their lifecycle is observed
//! by subscribing a listener, which receives [`LifecycleEvent`]s.

use async_trait::async_trait;
use core_types::{Feature, NotificationOptions, PermissionState};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::HostError;

/// Something that happened to a displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The user clicked the notification
    Click,
    /// The notification was dismissed or closed
    Close,
    /// The host failed to display it
    Error(String),
    /// The host displayed it
    Show,
}

/// Callback invoked for each lifecycle event of one notification.
pub type LifecycleListener = Box<dyn Fn(LifecycleEvent) + Send + Sync>;

/// A notification the host is displaying.
pub trait NativeNotification: Send + Sync + fmt::Debug {
    /// Host-assigned id
    fn id(&self) -> u64;

    /// Title it was created with
    fn title(&self) -> &str;

    /// Tag it was created with
    fn tag(&self) -> Option<&str>;

    /// Remove it from the screen
    fn close(&self);

    /// Receive every later lifecycle event
    fn subscribe(&self, listener: LifecycleListener);
}

/// Shared handle to a displayed notification.
pub type NotificationHandle = Arc<dyn NativeNotification>;

/// A worker registration able to display persistent notifications.
#[async_trait]
pub trait ServiceWorkerRegistration: Send + Sync {
    /// Scope URL of the registration
    fn scope(&self) -> &str;

    /// Whether `show_notification` is available on this host
    fn supports_persistent_notifications(&self) -> bool;

    /// Display a notification owned by the worker.
    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), HostError>;
}

/// Completion callback for hosts whose permission prompt reports through a
/// callback instead of resolving asynchronously.
pub type PermissionCallback = Box<dyn FnOnce(PermissionState) + Send>;

/// The page's notification host.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Whether the host exposes `feature`. Must not fail; unknown is `false`.
    fn probe(&self, feature: Feature) -> bool;

    /// Whether the permission prompt only supports the callback form.
    fn uses_legacy_permission_callback(&self) -> bool {
        false
    }

    /// Permission as the host reports it right now.
    fn permission(&self) -> PermissionState;

    /// Show the permission prompt and resolve with the user's answer.
    async fn request_permission(&self) -> Result<PermissionState, HostError>;

    /// Show the permission prompt, reporting through `callback`.
    fn request_permission_with_callback(&self, callback: PermissionCallback) -> Result<(), HostError> {
        drop(callback);
        Err(HostError::Unavailable("callback permission prompt".to_string()))
    }

    /// Push-style permission change notifications, when the host has them.
    fn permission_changes(&self) -> Option<watch::Receiver<PermissionState>> {
        None
    }

    /// The direct notification primitive.
    fn show(&self, title: &str, options: &NotificationOptions) -> Result<NotificationHandle, HostError>;

    /// Register the worker script and return its registration.
    async fn register_service_worker(
        &self,
        script_url: &str,
    ) -> Result<Arc<dyn ServiceWorkerRegistration>, HostError> {
        Err(HostError::Unavailable(format!("service worker {script_url}")))
    }
}
