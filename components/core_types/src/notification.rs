//! Notification requests and their display options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, as notification timestamps use.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// An action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Identifier reported back when the button is clicked.
    #[serde(rename = "action")]
    pub id: String,
    /// Button label.
    #[serde(rename = "title")]
    pub label: String,
    /// Optional icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationAction {
    /// Create an action with an id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }

    /// Attach an icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Display options for a notification.
///
/// Every field is optional so that two option sets can be merged key by key:
/// an unset field means "not specified", not "false" or "empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationOptions {
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Icon reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Badge reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Large image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Dedup/grouping key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Keep the notification until the user acts on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    /// Suppress sound and vibration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Alert again when replacing a notification with the same tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renotify: Option<bool>,
    /// Vibration pattern in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vec<u32>>,
    /// Ordered action buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
    /// Opaque application payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl NotificationOptions {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the badge reference.
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Set the content image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set `requireInteraction`.
    pub fn with_require_interaction(mut self, value: bool) -> Self {
        self.require_interaction = Some(value);
        self
    }

    /// Set `silent`.
    pub fn with_silent(mut self, value: bool) -> Self {
        self.silent = Some(value);
        self
    }

    /// Set `renotify`.
    pub fn with_renotify(mut self, value: bool) -> Self {
        self.renotify = Some(value);
        self
    }

    /// Set the action buttons.
    pub fn with_actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Set the opaque payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Shallow merge: every field set on `self` wins, unset fields are taken
    /// from `defaults`.
    pub fn merged_over(self, defaults: NotificationOptions) -> NotificationOptions {
        NotificationOptions {
            body: self.body.or(defaults.body),
            icon: self.icon.or(defaults.icon),
            badge: self.badge.or(defaults.badge),
            image: self.image.or(defaults.image),
            tag: self.tag.or(defaults.tag),
            timestamp: self.timestamp.or(defaults.timestamp),
            require_interaction: self.require_interaction.or(defaults.require_interaction),
            silent: self.silent.or(defaults.silent),
            renotify: self.renotify.or(defaults.renotify),
            vibrate: self.vibrate.or(defaults.vibrate),
            actions: self.actions.or(defaults.actions),
            data: self.data.or(defaults.data),
        }
    }

    /// True when the options carry action buttons.
    pub fn has_actions(&self) -> bool {
        self.actions.as_ref().is_some_and(|actions| !actions.is_empty())
    }

    /// True when the options use features only a worker registration can
    /// render reliably (action buttons or a content image).
    pub fn needs_worker(&self) -> bool {
        self.has_actions() || self.image.is_some()
    }

    /// `requireInteraction`, treating unset as `false`.
    pub fn requires_interaction(&self) -> bool {
        self.require_interaction.unwrap_or(false)
    }

    /// A copy with the action buttons removed.
    pub fn without_actions(&self) -> NotificationOptions {
        NotificationOptions {
            actions: None,
            ..self.clone()
        }
    }
}

/// A notification ready for dispatch.
///
/// Built once per call; nothing can change it after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    title: String,
    options: NotificationOptions,
    timestamp_created: DateTime<Utc>,
}

impl NotificationRequest {
    /// Create a request stamped with the current time.
    pub fn new(title: impl Into<String>, options: NotificationOptions) -> Self {
        Self {
            title: title.into(),
            options,
            timestamp_created: Utc::now(),
        }
    }

    /// The notification title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The merged display options.
    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }

    /// When the request was built.
    pub fn timestamp_created(&self) -> DateTime<Utc> {
        self.timestamp_created
    }

    /// The body text, if any.
    pub fn body(&self) -> Option<&str> {
        self.options.body.as_deref()
    }

    /// Split into title and options.
    pub fn into_parts(self) -> (String, NotificationOptions) {
        (self.title, self.options)
    }
}
