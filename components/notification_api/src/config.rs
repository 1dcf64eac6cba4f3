//! Dispatcher configuration.

use core_types::assets;
use serde::{Deserialize, Serialize};

/// Settings for a [`NotificationDispatcher`](crate::NotificationDispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Prefix for the tag of every notification kind (`<prefix>-<kind>`)
    pub tag_prefix: String,
    /// Worker script registered by `initialize`
    pub worker_script: String,
    /// Default icon
    pub icon: String,
    /// Default badge
    pub badge: String,
    /// Default content image for rich notifications
    pub image: String,
}

impl DispatcherConfig {
    /// Parse from JSON, filling unset fields with defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Tag for a notification kind.
    pub fn tag_for(&self, kind: &str) -> String {
        format!("{}-{}", self.tag_prefix, kind)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            tag_prefix: "pushbell".to_string(),
            worker_script: "./sw.js".to_string(),
            icon: assets::DEFAULT_ICON.to_string(),
            badge: assets::DEFAULT_BADGE.to_string(),
            image: assets::DEFAULT_IMAGE.to_string(),
        }
    }
}
