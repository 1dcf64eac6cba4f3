//! Service worker lifecycle states.

use serde::{Deserialize, Serialize};

/// Service Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceWorkerState {
    /// Script parsed, nothing run yet
    #[default]
    Parsed,
    /// `install` is populating the new cache generation
    Installing,
    /// Installed, waiting for activation
    Installed,
    /// `activate` is removing stale generations
    Activating,
    /// Controlling clients and intercepting fetches
    Activated,
    /// Replaced or unregistered
    Redundant,
}

impl ServiceWorkerState {
    /// Check if this state allows fetch interception
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, ServiceWorkerState::Activated)
    }

    /// Check if the worker is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceWorkerState::Redundant)
    }

    /// Whether the lifecycle may move from `self` to `next`.
    ///
    /// Re-running install or activate on an already activated worker is
    /// allowed; it is how a new generation replaces the current one.
    pub fn can_transition_to(&self, next: ServiceWorkerState) -> bool {
        use ServiceWorkerState::*;
        match (self, next) {
            (Redundant, _) => false,
            (_, Redundant) => true,
            (Parsed | Installed | Activated, Installing) => true,
            (Installing, Installed) => true,
            (Installed | Activated, Activating) => true,
            (Activating, Activated) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ServiceWorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceWorkerState::Parsed => write!(f, "parsed"),
            ServiceWorkerState::Installing => write!(f, "installing"),
            ServiceWorkerState::Installed => write!(f, "installed"),
            ServiceWorkerState::Activating => write!(f, "activating"),
            ServiceWorkerState::Activated => write!(f, "activated"),
            ServiceWorkerState::Redundant => write!(f, "redundant"),
        }
    }
}
