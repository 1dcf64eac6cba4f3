//! Host notification capabilities.
//!
//! A [`CapabilitySet`] is computed once at startup by probing the host and is
//! read-only afterwards. Anything that could not be detected is `false`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single detectable notification feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// The direct notification primitive exists.
    Basic,
    /// A worker registration can show persistent notifications.
    Persistent,
    /// Notifications can carry action buttons.
    Actions,
    /// Monochrome badge images.
    Badge,
    /// Large content images.
    Image,
    /// Notifications that stay until the user acts.
    RequireInteraction,
    /// Notifications without sound or vibration.
    Silent,
    /// Caller-supplied timestamps.
    Timestamp,
    /// Vibration patterns.
    Vibrate,
}

impl Feature {
    /// Every feature, in probe order.
    pub const ALL: [Feature; 9] = [
        Feature::Basic,
        Feature::Persistent,
        Feature::Actions,
        Feature::Badge,
        Feature::Image,
        Feature::RequireInteraction,
        Feature::Silent,
        Feature::Timestamp,
        Feature::Vibrate,
    ];

    /// The feature's key as the host names it.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Basic => "basic",
            Feature::Persistent => "persistent",
            Feature::Actions => "actions",
            Feature::Badge => "badge",
            Feature::Image => "image",
            Feature::RequireInteraction => "requireInteraction",
            Feature::Silent => "silent",
            Feature::Timestamp => "timestamp",
            Feature::Vibrate => "vibrate",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How the host's permission prompt reports its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostStrategy {
    /// The prompt resolves asynchronously with the new state.
    #[default]
    Standard,
    /// The prompt reports through a completion callback.
    LegacyCallback,
}

/// Immutable record of the notification features a host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySet {
    /// The direct notification primitive exists.
    pub basic: bool,
    /// Worker-backed persistent notifications are available.
    pub persistent: bool,
    /// Action buttons are supported.
    pub actions: bool,
    /// Badges are supported.
    pub badge: bool,
    /// Content images are supported.
    pub image: bool,
    /// `requireInteraction` is honoured.
    pub require_interaction: bool,
    /// Silent notifications are supported.
    pub silent: bool,
    /// Custom timestamps are supported.
    pub timestamp: bool,
    /// Vibration patterns are supported.
    pub vibrate: bool,
    /// Permission prompt flavour chosen at detection time.
    pub host_strategy: HostStrategy,
}

impl CapabilitySet {
    /// A host with no notification support whatsoever.
    pub fn none() -> Self {
        Self::default()
    }

    /// A host supporting every feature through the standard prompt.
    pub fn full() -> Self {
        Self::from_probe(|_| true, HostStrategy::Standard)
    }

    /// Builds a set by asking `probe` about each feature.
    pub fn from_probe(mut probe: impl FnMut(Feature) -> bool, host_strategy: HostStrategy) -> Self {
        Self {
            basic: probe(Feature::Basic),
            persistent: probe(Feature::Persistent),
            actions: probe(Feature::Actions),
            badge: probe(Feature::Badge),
            image: probe(Feature::Image),
            require_interaction: probe(Feature::RequireInteraction),
            silent: probe(Feature::Silent),
            timestamp: probe(Feature::Timestamp),
            vibrate: probe(Feature::Vibrate),
            host_strategy,
        }
    }

    /// Looks up a single feature.
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Basic => self.basic,
            Feature::Persistent => self.persistent,
            Feature::Actions => self.actions,
            Feature::Badge => self.badge,
            Feature::Image => self.image,
            Feature::RequireInteraction => self.require_interaction,
            Feature::Silent => self.silent,
            Feature::Timestamp => self.timestamp,
            Feature::Vibrate => self.vibrate,
        }
    }

    /// Features present on this host, in probe order.
    pub fn supported(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| self.supports(*feature))
            .collect()
    }
}
