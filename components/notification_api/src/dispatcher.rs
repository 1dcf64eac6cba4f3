//! Notification routing.
//!
//! Each `show_*` call merges the caller's options over the kind defaults and
//! takes exactly one path:
//!
//! 1. the fallback channel when native delivery is impossible,
//! 2. the worker registration when the request needs worker-only features,
//! 3. the direct host primitive otherwise.
//!
//! A path that fails at call time degrades to the fallback channel, so the
//! show family never returns an error.

use core_types::{
    now_millis, CapabilitySet, NotificationAction, NotificationOptions, NotificationRequest,
    NotifyError, PermissionState, Result,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use web_platform::{HostError, LifecycleEvent, NotificationHandle, NotificationHost, ServiceWorkerRegistration};

use crate::capability::detect;
use crate::config::DispatcherConfig;
use crate::fallback::{FallbackChannel, FallbackEntry};
use crate::hooks::NotificationHooks;
use crate::permission::{PermissionStateMachine, PermissionWatch};

/// The notification presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Plain title and body
    Basic,
    /// Adds a content image
    Rich,
    /// Adds yes/no/later action buttons
    Actions,
    /// Only the shared defaults
    Custom,
}

impl NotificationKind {
    /// Name used in the kind's tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Basic => "basic",
            NotificationKind::Rich => "rich",
            NotificationKind::Actions => "actions",
            NotificationKind::Custom => "custom",
        }
    }

    /// Default options for this kind.
    pub fn defaults(&self, config: &DispatcherConfig) -> NotificationOptions {
        let shared = NotificationOptions::new()
            .with_icon(config.icon.clone())
            .with_badge(config.badge.clone())
            .with_tag(config.tag_for(self.as_str()))
            .with_timestamp(now_millis());

        match self {
            NotificationKind::Basic => shared.with_body("This is a basic notification from PushBell"),
            NotificationKind::Rich => shared
                .with_body("This is a rich notification with enhanced features")
                .with_image(config.image.clone())
                .with_require_interaction(false)
                .with_silent(false),
            NotificationKind::Actions => shared
                .with_body("This notification has action buttons you can interact with")
                .with_require_interaction(true)
                .with_actions(vec![
                    NotificationAction::new("yes", "Yes").with_icon("\u{2705}"),
                    NotificationAction::new("no", "No").with_icon("\u{274c}"),
                    NotificationAction::new("later", "Remind Later").with_icon("\u{23f0}"),
                ]),
            NotificationKind::Custom => shared,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a notification ended up being delivered.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Shown by the direct host primitive
    Native(NotificationHandle),
    /// Handed to the worker registration
    Worker {
        /// Title passed to the worker
        title: String,
        /// Merged options passed to the worker
        options: NotificationOptions,
    },
    /// Shown in the in-page fallback channel
    Fallback(FallbackEntry),
}

impl Delivery {
    /// True for the fallback path.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Delivery::Fallback(_))
    }

    /// The fallback entry, if this delivery degraded.
    pub fn fallback_entry(&self) -> Option<&FallbackEntry> {
        match self {
            Delivery::Fallback(entry) => Some(entry),
            _ => None,
        }
    }

    /// The native handle, if shown directly.
    pub fn native(&self) -> Option<&NotificationHandle> {
        match self {
            Delivery::Native(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Capability-aware notification dispatcher for one page.
pub struct NotificationDispatcher {
    host: Arc<dyn NotificationHost>,
    capabilities: CapabilitySet,
    permission: Arc<PermissionStateMachine>,
    fallback: FallbackChannel,
    hooks: Arc<NotificationHooks>,
    registration: RwLock<Option<Arc<dyn ServiceWorkerRegistration>>>,
    config: DispatcherConfig,
}

impl NotificationDispatcher {
    /// Detect capabilities on `host` and build a dispatcher over it.
    pub fn new(host: Arc<dyn NotificationHost>, config: DispatcherConfig) -> Self {
        let capabilities = detect(host.as_ref());
        let permission = Arc::new(PermissionStateMachine::new(Arc::clone(&host), capabilities));
        let hooks = Arc::new(NotificationHooks::new());

        let hook_table = Arc::clone(&hooks);
        permission.subscribe(move |state| hook_table.emit_permission_change(state));

        Self {
            host,
            capabilities,
            permission,
            fallback: FallbackChannel::new(),
            hooks,
            registration: RwLock::new(None),
            config,
        }
    }

    /// Register the worker script and start watching permission.
    ///
    /// Registration failure is logged and leaves the dispatcher without a
    /// worker path. Watching stops when the returned guard is dropped.
    pub async fn initialize(&self) -> PermissionWatch {
        if self.capabilities.persistent {
            match self.host.register_service_worker(&self.config.worker_script).await {
                Ok(registration) => {
                    tracing::info!(scope = registration.scope(), "service worker registered");
                    self.set_registration(registration);
                }
                Err(err) => {
                    tracing::warn!(script = %self.config.worker_script, error = %err, "service worker registration failed");
                }
            }
        }
        self.permission.watch()
    }

    /// Use `registration` for worker-backed delivery.
    pub fn set_registration(&self, registration: Arc<dyn ServiceWorkerRegistration>) {
        *self.registration.write() = Some(registration);
    }

    /// Capabilities detected at construction.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// The permission state machine.
    pub fn permission(&self) -> &Arc<PermissionStateMachine> {
        &self.permission
    }

    /// Current permission, read from the host.
    pub fn permission_status(&self) -> PermissionState {
        self.permission.status()
    }

    /// Prompt for permission. Fails only on hosts without notifications.
    pub async fn request_permission(&self) -> Result<PermissionState> {
        self.permission.request_permission().await
    }

    /// The lifecycle hook table.
    pub fn hooks(&self) -> &NotificationHooks {
        &self.hooks
    }

    /// The in-page fallback channel.
    pub fn fallback(&self) -> &FallbackChannel {
        &self.fallback
    }

    /// Configuration in use.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Whether anything native can be shown right now.
    pub fn can_deliver_natively(&self) -> bool {
        self.capabilities.basic && self.permission.status() == PermissionState::Granted
    }

    /// Show a basic notification.
    pub async fn show_basic(&self, title: &str, options: NotificationOptions) -> Delivery {
        self.show(NotificationKind::Basic, title, options).await
    }

    /// Show a notification with a content image.
    pub async fn show_rich(&self, title: &str, options: NotificationOptions) -> Delivery {
        self.show(NotificationKind::Rich, title, options).await
    }

    /// Show a notification with yes/no/later buttons.
    pub async fn show_actions(&self, title: &str, options: NotificationOptions) -> Delivery {
        self.show(NotificationKind::Actions, title, options).await
    }

    /// Show a notification with only the shared defaults.
    pub async fn show_custom(&self, title: &str, options: NotificationOptions) -> Delivery {
        self.show(NotificationKind::Custom, title, options).await
    }

    /// Merge, route and deliver one notification.
    pub async fn show(&self, kind: NotificationKind, title: &str, options: NotificationOptions) -> Delivery {
        if !self.can_deliver_natively() {
            tracing::debug!(%kind, title, permission = %self.permission.status(), "native delivery unavailable");
            return Delivery::Fallback(self.degrade(title, &options));
        }

        let request = NotificationRequest::new(title, options.clone().merged_over(kind.defaults(&self.config)));

        if request.options().needs_worker() {
            if let Some(registration) = self.persistent_registration() {
                let shown = registration.show_notification(request.title(), request.options()).await;
                return match shown {
                    Ok(()) => {
                        tracing::debug!(%kind, title, "delivered through service worker");
                        let (title, options) = request.into_parts();
                        Delivery::Worker { title, options }
                    }
                    Err(err) => {
                        let failure = delivery_failure(err);
                        tracing::warn!(%kind, title, error = %failure, "worker notification failed");
                        Delivery::Fallback(self.degrade(title, &options))
                    }
                };
            }
        }

        let direct_options = if request.options().has_actions() && !self.capabilities.actions {
            request.options().without_actions()
        } else {
            request.options().clone()
        };

        match self.host.show(request.title(), &direct_options) {
            Ok(notification) => {
                tracing::debug!(%kind, title, id = notification.id(), "delivered natively");
                self.attach(&notification);
                Delivery::Native(notification)
            }
            Err(err) => {
                let failure = delivery_failure(err);
                tracing::warn!(%kind, title, error = %failure, "native notification failed");
                Delivery::Fallback(self.degrade(title, &options))
            }
        }
    }

    fn persistent_registration(&self) -> Option<Arc<dyn ServiceWorkerRegistration>> {
        if !self.capabilities.persistent {
            return None;
        }
        self.registration
            .read()
            .as_ref()
            .filter(|registration| registration.supports_persistent_notifications())
            .cloned()
    }

    fn degrade(&self, title: &str, options: &NotificationOptions) -> FallbackEntry {
        let entry = self.fallback.enqueue(title, options);
        self.hooks.emit_fallback(&entry);
        entry
    }

    /// Re-emit the notification's lifecycle through the hook table.
    fn attach(&self, notification: &NotificationHandle) {
        let hooks = Arc::clone(&self.hooks);
        let weak = Arc::downgrade(notification);
        notification.subscribe(Box::new(move |event| {
            let Some(notification) = weak.upgrade() else { return };
            hooks.emit_lifecycle(&notification, &event);
            if event == LifecycleEvent::Click {
                notification.close();
            }
        }));
    }
}

/// A host failure on the show path. Always recovered by the fallback channel.
fn delivery_failure(err: HostError) -> NotifyError {
    NotifyError::Delivery(err.to_string())
}
