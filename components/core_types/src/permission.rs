//! Notification permission states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host permission for displaying notifications.
///
/// `Default` is the only state a prompt can leave; `Granted` and `Denied`
/// change only out of band (for example from OS settings), and
/// `Unsupported` never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not decided yet.
    #[default]
    Default,
    /// The user allowed notifications.
    Granted,
    /// The user blocked notifications.
    Denied,
    /// The host cannot display notifications at all.
    Unsupported,
}

impl PermissionState {
    /// Returns the lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Default => "default",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Unsupported => "unsupported",
        }
    }

    /// True when asking again would not show a prompt.
    pub fn is_settled(&self) -> bool {
        matches!(self, PermissionState::Granted | PermissionState::Denied)
    }

    /// True only for `Granted`.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
