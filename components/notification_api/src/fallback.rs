//! In-page fallback channel.
//!
//! When nothing native can display a notification, it is shown here instead.
//! Entries expire on their own after [`FALLBACK_TTL`] and can be dismissed
//! early. Enqueueing never fails.

use core_types::NotificationOptions;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// How long a fallback entry stays visible.
pub const FALLBACK_TTL: Duration = Duration::from_secs(5);

/// Body shown when the request had none.
pub const FALLBACK_BODY: &str = "Notification fallback";

/// One visible fallback notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEntry {
    /// Channel-assigned id, used to dismiss it
    pub id: u64,
    /// Title of the requested notification
    pub title: String,
    /// Body of the requested notification, or [`FALLBACK_BODY`]
    pub body: String,
    /// When it was enqueued
    pub timestamp_created: Instant,
    /// How long it stays visible
    pub ttl: Duration,
}

impl FallbackEntry {
    /// When the entry disappears.
    pub fn expires_at(&self) -> Instant {
        self.timestamp_created + self.ttl
    }

    /// Whether the entry's lifetime is over at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Default)]
struct Inner {
    entries: Vec<FallbackEntry>,
    timers: HashMap<u64, AbortHandle>,
}

impl Inner {
    fn prune(&mut self, now: Instant) {
        let timers = &mut self.timers;
        self.entries.retain(|entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                if let Some(timer) = timers.remove(&entry.id) {
                    timer.abort();
                }
            }
            keep
        });
    }
}

/// Auto-expiring in-page notification surface.
pub struct FallbackChannel {
    inner: Arc<Mutex<Inner>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl FallbackChannel {
    /// Channel with the standard [`FALLBACK_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(FALLBACK_TTL)
    }

    /// Channel with a custom entry lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            next_id: AtomicU64::new(1),
            ttl,
        }
    }

    /// Display a fallback for `title`.
    ///
    /// Removal is scheduled on the current Tokio runtime when there is one.
    /// Without a runtime, expired entries are still hidden from
    /// [`entries`](Self::entries).
    pub fn enqueue(&self, title: &str, options: &NotificationOptions) -> FallbackEntry {
        let entry = FallbackEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title: title.to_string(),
            body: options.body.clone().unwrap_or_else(|| FALLBACK_BODY.to_string()),
            timestamp_created: Instant::now(),
            ttl: self.ttl,
        };

        let mut inner = self.inner.lock();
        inner.prune(entry.timestamp_created);
        inner.entries.push(entry.clone());
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let task = runtime.spawn(expire(Arc::downgrade(&self.inner), entry.id, entry.expires_at()));
            inner.timers.insert(entry.id, task.abort_handle());
        }
        tracing::debug!(id = entry.id, title = %entry.title, "fallback notification shown");
        entry
    }

    /// Remove an entry before it expires. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.inner.lock();
        inner.prune(Instant::now());
        if let Some(timer) = inner.timers.remove(&id) {
            timer.abort();
        }
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        inner.entries.len() != before
    }

    /// Currently visible entries, oldest first.
    pub fn entries(&self) -> Vec<FallbackEntry> {
        let mut inner = self.inner.lock();
        inner.prune(Instant::now());
        inner.entries.clone()
    }

    /// Number of visible entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FallbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FallbackChannel {
    fn drop(&mut self) {
        for (_, timer) in self.inner.lock().timers.drain() {
            timer.abort();
        }
    }
}

async fn expire(inner: Weak<Mutex<Inner>>, id: u64, at: Instant) {
    tokio::time::sleep_until(at).await;
    if let Some(inner) = inner.upgrade() {
        let mut inner = inner.lock();
        inner.timers.remove(&id);
        inner.entries.retain(|entry| entry.id != id);
    }
}
