//! Foreground notification dispatcher.
//!
//! Detects what the host can do, drives the permission state machine, and
//! routes each notification down exactly one path: the worker registration,
//! the direct host primitive, or the in-page fallback channel.
//!
//! # Overview
//!
//! - [`detect`] - One-shot capability probe of a [`NotificationHost`](web_platform::NotificationHost)
//! - [`PermissionStateMachine`] - Permission status, prompting and change watching
//! - [`FallbackChannel`] - Auto-expiring in-page notification surface
//! - [`NotificationHooks`] - Replaceable lifecycle callbacks
//! - [`NotificationDispatcher`] - The routing facade

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod capability;
pub mod config;
pub mod dispatcher;
pub mod fallback;
pub mod hooks;
pub mod permission;

pub use capability::detect;
pub use config::DispatcherConfig;
pub use dispatcher::{Delivery, NotificationDispatcher, NotificationKind};
pub use fallback::{FallbackChannel, FallbackEntry, FALLBACK_BODY, FALLBACK_TTL};
pub use hooks::NotificationHooks;
pub use permission::{PermissionListener, PermissionStateMachine, PermissionWatch, PERMISSION_POLL_INTERVAL};
