//! Error taxonomy for the notification core.
//!
//! Denied permission is deliberately absent: it is reported as
//! [`PermissionState::Denied`](crate::PermissionState::Denied), never raised.

use thiserror::Error;

/// Errors surfaced by the notification core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The host has no notification capability at all.
    #[error("notifications are not supported on this host")]
    Unsupported,

    /// A native notification primitive failed at call time.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;
