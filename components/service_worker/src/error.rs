//! Worker error types.

use thiserror::Error;
use web_platform::{HostError, OriginError, ServiceWorkerState};

/// Failures that stop a worker operation.
///
/// Cache and network failures inside install and fetch handling are
/// tolerated and logged instead; they never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// Configuration could not be parsed
    #[error("invalid worker configuration: {0}")]
    Config(String),

    /// The configured origin is unusable
    #[error("invalid worker origin: {0}")]
    Origin(#[from] OriginError),

    /// A lifecycle step was requested out of order
    #[error("cannot move worker from {from} to {to}")]
    InvalidTransition {
        /// Current state
        from: ServiceWorkerState,
        /// Requested state
        to: ServiceWorkerState,
    },

    /// A host primitive failed
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;
