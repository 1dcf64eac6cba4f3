//! Worker configuration.

use core_types::assets;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use web_platform::Origin;

use crate::error::{Result, WorkerError};

/// Everything the worker needs to know about the application it serves.
///
/// The cache name is the generation's version: change it whenever the
/// resource manifest changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerConfig {
    /// Name of the active cache generation
    pub cache_name: String,
    /// Origin the worker is registered on
    pub origin: String,
    /// Same-origin resources that must be cached at install
    pub local_resources: Vec<String>,
    /// Cross-origin resources cached on a best-effort basis
    pub external_resources: Vec<String>,
    /// Cached document served to navigations that fail offline
    pub offline_document: String,
    /// Window opened when a click finds no open window
    pub app_url: String,
    /// Fetch attempts per local resource during install
    pub install_attempts: u32,
    /// Delay before a "remind later" notification is shown
    pub reminder_delay_secs: u64,
    /// Prefix of worker notification tags
    pub tag_prefix: String,
    /// Icon for worker-originated notifications
    pub icon: String,
    /// Badge for worker-originated notifications
    pub badge: String,
}

impl WorkerConfig {
    /// Parse from JSON, filling unset fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WorkerError::Config(e.to_string()))
    }

    /// The parsed origin.
    pub fn parsed_origin(&self) -> Result<Origin> {
        Ok(Origin::parse(&self.origin)?)
    }

    /// Reminder delay as a duration.
    pub fn reminder_delay(&self) -> Duration {
        Duration::from_secs(self.reminder_delay_secs)
    }

    /// Tag for a worker notification kind.
    pub fn tag_for(&self, kind: &str) -> String {
        format!("{}-{}", self.tag_prefix, kind)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: "pushbell-v1".to_string(),
            origin: "http://localhost:8000".to_string(),
            local_resources: ["/", "/index.html", "/styles.css", "/app.js", "/notification-api.js"]
                .into_iter()
                .map(String::from)
                .collect(),
            external_resources: vec![
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css".to_string(),
            ],
            offline_document: "/".to_string(),
            app_url: "/".to_string(),
            install_attempts: 2,
            reminder_delay_secs: 5 * 60,
            tag_prefix: "pushbell".to_string(),
            icon: assets::DEFAULT_ICON.to_string(),
            badge: assets::DEFAULT_BADGE.to_string(),
        }
    }
}
