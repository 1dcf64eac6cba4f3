//! Failures reported by host primitives.

use thiserror::Error;

/// A host notification, client or registration call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host does not provide the primitive
    #[error("host primitive unavailable: {0}")]
    Unavailable(String),
    /// The primitive threw synchronously
    #[error("host call threw: {0}")]
    Threw(String),
    /// The primitive's promise rejected
    #[error("host call rejected: {0}")]
    Rejected(String),
}
