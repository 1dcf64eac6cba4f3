//! The worker context.
//!
//! Owns the cache generation for the application's resources, answers
//! intercepted fetches from it, and handles the events the host delivers to
//! the worker: push, notification clicks and closes, and messages from the
//! page.
//!
//! # Overview
//!
//! - [`WorkerConfig`] - Cache name, resource manifest and worker policies
//! - [`CacheManager`] - Install, activate and fetch strategies
//! - [`MessageBridge`] - Page-to-worker command protocol
//! - [`NotificationEvents`] - Click actions, reminders and window focus
//! - [`ServiceWorkerScope`] - Routes host events to the above

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cache_manager;
pub mod config;
pub mod error;
pub mod message_bridge;
pub mod notification_events;
pub mod push;
pub mod scope;

pub use cache_manager::{CacheManager, FetchOutcome, InstallReport};
pub use config::WorkerConfig;
pub use error::{Result, WorkerError};
pub use message_bridge::MessageBridge;
pub use notification_events::{ClickAction, ClickOutcome, NotificationEvents, WindowOutcome};
pub use push::PushNotification;
pub use scope::{EventOutcome, ServiceWorkerScope, WorkerEvent};
