//! Core notification types shared by the foreground and worker contexts.
//!
//! This crate holds the data model both sides of the application agree on:
//! what a notification request looks like, which permission states exist,
//! which host features can be detected, and the error taxonomy.
//!
//! # Overview
//!
//! - [`NotificationOptions`] - Optional display settings, merged shallowly
//! - [`NotificationRequest`] - A titled, timestamped request, immutable once built
//! - [`PermissionState`] - Host permission for showing notifications
//! - [`CapabilitySet`] - Which notification features the host exposes
//! - [`NotifyError`] - Error taxonomy for the notification core
//!
//! # Examples
//!
//! ```
//! use core_types::{NotificationOptions, NotificationRequest};
//!
//! let defaults = NotificationOptions::new()
//!     .with_tag("pushbell-basic")
//!     .with_require_interaction(false);
//! let caller = NotificationOptions::new().with_require_interaction(true);
//!
//! let request = NotificationRequest::new("Hello", caller.merged_over(defaults));
//! assert!(request.options().requires_interaction());
//! assert_eq!(request.options().tag.as_deref(), Some("pushbell-basic"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod assets;
mod capability;
mod error;
mod notification;
mod permission;

pub use capability::{CapabilitySet, Feature, HostStrategy};
pub use error::{NotifyError, Result};
pub use notification::{now_millis, NotificationAction, NotificationOptions, NotificationRequest};
pub use permission::PermissionState;
