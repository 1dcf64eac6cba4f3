//! Notification click and close handling in the worker.

use core_types::NotificationOptions;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::task::AbortHandle;
use web_platform::{Clients, NotificationHandle, Origin, ServiceWorkerRegistration, WindowClient};

use crate::config::WorkerConfig;

const REMINDER_TITLE: &str = "Reminder";
const REMINDER_BODY: &str = "This is your scheduled reminder from PushBell";

/// The button (or body) a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// "Yes" button
    Yes,
    /// "No" button
    No,
    /// "Remind Later" button
    Later,
    /// The notification body
    Body,
    /// A button this worker does not know
    Other(String),
}

impl ClickAction {
    /// Classify the action id reported by the host. Empty means the body.
    pub fn parse(action: &str) -> Self {
        match action {
            "" => ClickAction::Body,
            "yes" => ClickAction::Yes,
            "no" => ClickAction::No,
            "later" => ClickAction::Later,
            other => ClickAction::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickAction::Yes => f.write_str("yes"),
            ClickAction::No => f.write_str("no"),
            ClickAction::Later => f.write_str("later"),
            ClickAction::Body => f.write_str("body"),
            ClickAction::Other(action) => f.write_str(action),
        }
    }
}

/// Which window ended up in front after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    /// An open same-origin window was focused
    Focused(WindowClient),
    /// No window was open, so one was opened
    Opened(WindowClient),
    /// The host refused both
    Failed,
}

/// Result of handling one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// What was clicked
    pub action: ClickAction,
    /// Whether a reminder was scheduled
    pub reminder_scheduled: bool,
    /// The window brought to front
    pub window: WindowOutcome,
}

/// Handles notification clicks and closes.
pub struct NotificationEvents {
    config: WorkerConfig,
    origin: Origin,
    registration: Arc<dyn ServiceWorkerRegistration>,
    clients: Arc<dyn Clients>,
    reminders: Mutex<Vec<AbortHandle>>,
}

impl NotificationEvents {
    /// Create a handler. `origin` decides which windows count as ours.
    pub fn new(
        config: WorkerConfig,
        origin: Origin,
        registration: Arc<dyn ServiceWorkerRegistration>,
        clients: Arc<dyn Clients>,
    ) -> Self {
        Self {
            config,
            origin,
            registration,
            clients,
            reminders: Mutex::new(Vec::new()),
        }
    }

    /// Handle a click on `notification`.
    ///
    /// Runs the action, closes the notification, then focuses an open
    /// same-origin window or opens the application.
    pub async fn handle_click(&self, notification: &NotificationHandle, action: &str) -> ClickOutcome {
        let action = ClickAction::parse(action);
        tracing::info!(%action, title = notification.title(), "notification clicked");

        let reminder_scheduled = action == ClickAction::Later;
        if reminder_scheduled {
            self.schedule_reminder();
        }

        notification.close();
        let window = self.focus_or_open().await;

        ClickOutcome {
            action,
            reminder_scheduled,
            window,
        }
    }

    /// Record a close. Nothing else changes.
    pub fn handle_close(&self, notification: &NotificationHandle) {
        tracing::info!(title = notification.title(), tag = ?notification.tag(), "notification closed");
    }

    /// Reminders scheduled and not yet shown.
    pub fn pending_reminders(&self) -> usize {
        let mut reminders = self.reminders.lock();
        reminders.retain(|reminder| !reminder.is_finished());
        reminders.len()
    }

    fn schedule_reminder(&self) {
        let registration = Arc::clone(&self.registration);
        let delay = self.config.reminder_delay();
        let options = NotificationOptions::new()
            .with_body(REMINDER_BODY)
            .with_icon(self.config.icon.clone())
            .with_badge(self.config.badge.clone())
            .with_tag(self.config.tag_for("reminder"))
            .with_require_interaction(true);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = registration.show_notification(REMINDER_TITLE, &options).await {
                tracing::warn!(error = %err, "reminder could not be shown");
            }
        });
        tracing::debug!(delay_secs = delay.as_secs(), "reminder scheduled");
        let mut reminders = self.reminders.lock();
        reminders.retain(|reminder| !reminder.is_finished());
        reminders.push(task.abort_handle());
    }

    async fn focus_or_open(&self) -> WindowOutcome {
        let windows = self.clients.match_all_windows().await;
        if let Some(window) = windows.iter().find(|w| self.origin.is_same_origin_url(&w.url)) {
            return match self.clients.focus(window).await {
                Ok(client) => WindowOutcome::Focused(client),
                Err(err) => {
                    tracing::warn!(client = %window.id, error = %err, "could not focus window");
                    WindowOutcome::Failed
                }
            };
        }

        let url = self.origin.resolve(&self.config.app_url);
        match self.clients.open_window(&url).await {
            Ok(client) => WindowOutcome::Opened(client),
            Err(err) => {
                tracing::warn!(%url, error = %err, "could not open window");
                WindowOutcome::Failed
            }
        }
    }
}

impl Drop for NotificationEvents {
    fn drop(&mut self) {
        for reminder in self.reminders.lock().drain(..) {
            reminder.abort();
        }
    }
}
