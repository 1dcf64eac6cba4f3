//! Permission state machine.
//!
//! The host is the only source of truth: [`PermissionStateMachine::status`]
//! reads it on every call. The machine remembers the last state it reported
//! so listeners hear about each change exactly once.

use core_types::{CapabilitySet, HostStrategy, NotifyError, PermissionState, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use web_platform::NotificationHost;

/// How often permission is re-read on hosts without change notifications.
pub const PERMISSION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Callback invoked with the new state after each permission change.
pub type PermissionListener = Arc<dyn Fn(PermissionState) + Send + Sync>;

/// Tracks notification permission for one page.
pub struct PermissionStateMachine {
    host: Arc<dyn NotificationHost>,
    capabilities: CapabilitySet,
    last_known: Mutex<PermissionState>,
    listeners: Mutex<Vec<(u64, PermissionListener)>>,
    next_listener: AtomicU64,
}

impl PermissionStateMachine {
    /// Create a machine over `host`, using the already-detected capabilities.
    pub fn new(host: Arc<dyn NotificationHost>, capabilities: CapabilitySet) -> Self {
        let initial = if capabilities.basic {
            host.permission()
        } else {
            PermissionState::Unsupported
        };
        Self {
            host,
            capabilities,
            last_known: Mutex::new(initial),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Current permission, read from the host.
    pub fn status(&self) -> PermissionState {
        if !self.capabilities.basic {
            return PermissionState::Unsupported;
        }
        self.host.permission()
    }

    /// Ask the user for permission.
    ///
    /// A settled permission is returned without prompting. A dismissed
    /// prompt leaves the state at `default`. Fails only when the host has no
    /// notification capability.
    pub async fn request_permission(&self) -> Result<PermissionState> {
        if !self.capabilities.basic {
            return Err(NotifyError::Unsupported);
        }

        let current = self.status();
        if current.is_settled() {
            return Ok(current);
        }

        let answer = match self.capabilities.host_strategy {
            HostStrategy::Standard => self.host.request_permission().await,
            HostStrategy::LegacyCallback => self.prompt_with_callback().await,
        };

        let state = match answer {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(error = %err, "permission prompt failed");
                PermissionState::Default
            }
        };
        self.record(state);
        Ok(state)
    }

    async fn prompt_with_callback(&self) -> std::result::Result<PermissionState, web_platform::HostError> {
        let (tx, rx) = oneshot::channel();
        self.host.request_permission_with_callback(Box::new(move |state| {
            let _ = tx.send(state);
        }))?;
        // A host that drops the callback never answered.
        Ok(rx.await.unwrap_or(PermissionState::Default))
    }

    /// Register a listener for permission changes. Returns an id for
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, listener: impl Fn(PermissionState) + Send + Sync + 'static) -> u64 {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Store `state` and notify listeners if it differs from the last one seen.
    fn record(&self, state: PermissionState) {
        {
            let mut last = self.last_known.lock();
            if *last == state {
                return;
            }
            let previous = *last;
            tracing::info!(from = %previous, to = %state, "notification permission changed");
            *last = state;
        }

        let listeners: Vec<PermissionListener> =
            self.listeners.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for listener in listeners {
            listener(state);
        }
    }

    /// Re-read the host and notify listeners if permission changed out of band.
    pub fn refresh(&self) -> PermissionState {
        let state = self.status();
        self.record(state);
        state
    }

    /// Start watching for out-of-band permission changes.
    ///
    /// Uses the host's change notifications when it has them, otherwise
    /// polls every [`PERMISSION_POLL_INTERVAL`]. Watching stops when the
    /// returned guard is dropped. Must be called inside a Tokio runtime.
    pub fn watch(self: &Arc<Self>) -> PermissionWatch {
        let machine = Arc::downgrade(self);
        let task = match self.host.permission_changes() {
            Some(changes) => tokio::spawn(observe_changes(machine, changes)),
            None => tokio::spawn(poll_changes(machine)),
        };
        PermissionWatch { task }
    }
}

async fn observe_changes(
    machine: Weak<PermissionStateMachine>,
    mut changes: tokio::sync::watch::Receiver<PermissionState>,
) {
    while changes.changed().await.is_ok() {
        let state = *changes.borrow_and_update();
        let Some(machine) = machine.upgrade() else { break };
        machine.record(state);
    }
}

async fn poll_changes(machine: Weak<PermissionStateMachine>) {
    let mut interval = tokio::time::interval(PERMISSION_POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(machine) = machine.upgrade() else { break };
        machine.refresh();
    }
}

/// Stops permission watching when dropped.
#[derive(Debug)]
pub struct PermissionWatch {
    task: JoinHandle<()>,
}

impl PermissionWatch {
    /// Stop watching now.
    pub fn stop(self) {
        self.task.abort();
    }

    /// True once the watcher has stopped on its own.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PermissionWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
