//! Host platform seams shared by the page and the service worker.
//!
//! Implements origins, the fetch model, Cache Storage generations, the
//! worker lifecycle, the page/worker message protocol, window clients and
//! the host notification primitives.

pub mod cache;
pub mod clients;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod messaging;
pub mod notification;
pub mod same_origin;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

// Re-export main types
pub use cache::{Cache, CacheError, CacheStorage};
pub use clients::{Clients, WindowClient};
pub use error::HostError;
pub use fetch::{
    FetchRequest, FetchResponse, Network, NetworkError, RequestDestination, RequestMethod,
    RequestMode, ResponseType,
};
pub use lifecycle::ServiceWorkerState;
pub use messaging::{
    CacheStatus, Envelope, MessageClient, MessageError, ReplyPort, ReplyReceiver, WorkerInbox,
    WorkerMessage, WorkerReply,
};
pub use notification::{
    LifecycleEvent, LifecycleListener, NativeNotification, NotificationHandle, NotificationHost,
    PermissionCallback, ServiceWorkerRegistration,
};
pub use same_origin::{Origin, OriginError};
