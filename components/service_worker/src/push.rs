//! Push payload handling.
//!
//! A push carries an optional payload. JSON objects are merged key by key
//! over the push defaults; any other non-empty payload becomes the body.

use core_types::{NotificationAction, NotificationOptions};
use serde_json::{Map, Value};
use web_platform::{HostError, ServiceWorkerRegistration};

use crate::config::WorkerConfig;

const PUSH_TITLE: &str = "PushBell Notification";
const PUSH_BODY: &str = "You have a new notification!";

/// A notification built from a push payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    /// Title to show
    pub title: String,
    /// Options to show it with
    pub options: NotificationOptions,
}

impl PushNotification {
    /// Build the notification for `payload`.
    pub fn from_payload(payload: Option<&[u8]>, config: &WorkerConfig) -> Self {
        let mut fields = defaults(config);

        if let Some(payload) = payload {
            match serde_json::from_slice::<Value>(payload) {
                Ok(Value::Object(data)) => merge(&mut fields, data),
                Ok(Value::Null) => {}
                parsed => {
                    if let Err(err) = parsed {
                        tracing::warn!(error = %err, "push payload is not JSON");
                    }
                    let text = String::from_utf8_lossy(payload);
                    if !text.is_empty() {
                        fields.insert("body".to_string(), Value::String(text.into_owned()));
                    }
                }
            }
        }

        let title = match fields.remove("title") {
            Some(Value::String(title)) => title,
            _ => PUSH_TITLE.to_string(),
        };
        let options = serde_json::from_value(Value::Object(fields)).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "push payload has unusable options");
            push_options(config)
        });

        Self { title, options }
    }

    /// Show it through the worker registration.
    pub async fn show(&self, registration: &dyn ServiceWorkerRegistration) -> Result<(), HostError> {
        registration.show_notification(&self.title, &self.options).await
    }
}

fn push_options(config: &WorkerConfig) -> NotificationOptions {
    NotificationOptions::new()
        .with_body(PUSH_BODY)
        .with_icon(config.icon.clone())
        .with_badge(config.badge.clone())
        .with_tag(config.tag_for("push"))
        .with_require_interaction(false)
        .with_actions(vec![
            NotificationAction::new("view", "View").with_icon("\u{1f441}\u{fe0f}"),
            NotificationAction::new("dismiss", "Dismiss").with_icon("\u{274c}"),
        ])
}

/// Copy each payload key over `fields`, skipping keys whose value has the
/// wrong shape for its option.
fn merge(fields: &mut Map<String, Value>, data: Map<String, Value>) {
    for (key, value) in data {
        let mut single = Map::new();
        single.insert(key.clone(), value);
        match serde_json::from_value::<NotificationOptions>(Value::Object(single.clone())) {
            Ok(_) => fields.extend(single),
            Err(err) => tracing::warn!(key = %key, error = %err, "ignoring push payload field"),
        }
    }
}

fn defaults(config: &WorkerConfig) -> Map<String, Value> {
    match serde_json::to_value(push_options(config)) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
