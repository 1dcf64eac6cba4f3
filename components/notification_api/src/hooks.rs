//! Replaceable lifecycle callbacks.
//!
//! Every hook defaults to doing nothing and can be replaced at any time,
//! including after notifications are already on screen.

use core_types::PermissionState;
use parking_lot::RwLock;
use std::sync::Arc;
use web_platform::{LifecycleEvent, NotificationHandle};

use crate::fallback::FallbackEntry;

type PermissionHook = Arc<dyn Fn(PermissionState) + Send + Sync>;
type NotificationHook = Arc<dyn Fn(&NotificationHandle) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&NotificationHandle, &str) + Send + Sync>;
type FallbackHook = Arc<dyn Fn(&FallbackEntry) + Send + Sync>;

/// Callbacks fired by the dispatcher.
#[derive(Default)]
pub struct NotificationHooks {
    permission_change: RwLock<Option<PermissionHook>>,
    click: RwLock<Option<NotificationHook>>,
    close: RwLock<Option<NotificationHook>>,
    error: RwLock<Option<ErrorHook>>,
    show: RwLock<Option<NotificationHook>>,
    fallback: RwLock<Option<FallbackHook>>,
}

impl NotificationHooks {
    /// All hooks as no-ops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after each permission change.
    pub fn on_permission_change(&self, hook: impl Fn(PermissionState) + Send + Sync + 'static) {
        *self.permission_change.write() = Some(Arc::new(hook));
    }

    /// Called when a native notification is clicked, before it is closed.
    pub fn on_click(&self, hook: impl Fn(&NotificationHandle) + Send + Sync + 'static) {
        *self.click.write() = Some(Arc::new(hook));
    }

    /// Called when a native notification closes.
    pub fn on_close(&self, hook: impl Fn(&NotificationHandle) + Send + Sync + 'static) {
        *self.close.write() = Some(Arc::new(hook));
    }

    /// Called when the host reports a display error.
    pub fn on_error(&self, hook: impl Fn(&NotificationHandle, &str) + Send + Sync + 'static) {
        *self.error.write() = Some(Arc::new(hook));
    }

    /// Called when the host reports a notification as shown.
    pub fn on_show(&self, hook: impl Fn(&NotificationHandle) + Send + Sync + 'static) {
        *self.show.write() = Some(Arc::new(hook));
    }

    /// Called for every fallback entry enqueued.
    pub fn on_fallback(&self, hook: impl Fn(&FallbackEntry) + Send + Sync + 'static) {
        *self.fallback.write() = Some(Arc::new(hook));
    }

    /// Reset every hook to a no-op.
    pub fn clear(&self) {
        *self.permission_change.write() = None;
        *self.click.write() = None;
        *self.close.write() = None;
        *self.error.write() = None;
        *self.show.write() = None;
        *self.fallback.write() = None;
    }

    pub(crate) fn emit_permission_change(&self, state: PermissionState) {
        let hook = self.permission_change.read().clone();
        if let Some(hook) = hook {
            hook(state);
        }
    }

    pub(crate) fn emit_lifecycle(&self, notification: &NotificationHandle, event: &LifecycleEvent) {
        let hook = match event {
            LifecycleEvent::Click => self.click.read().clone(),
            LifecycleEvent::Close => self.close.read().clone(),
            LifecycleEvent::Show => self.show.read().clone(),
            LifecycleEvent::Error(message) => {
                tracing::warn!(title = notification.title(), error = %message, "notification error");
                let hook = self.error.read().clone();
                if let Some(hook) = hook {
                    hook(notification, message);
                }
                return;
            }
        };
        if let Some(hook) = hook {
            hook(notification);
        }
    }

    pub(crate) fn emit_fallback(&self, entry: &FallbackEntry) {
        let hook = self.fallback.read().clone();
        if let Some(hook) = hook {
            hook(entry);
        }
    }
}
