//! In-memory host doubles for tests.
//!
//! Compiled for this crate's tests and for dependents that enable the
//! `test-support` feature.

use async_trait::async_trait;
use core_types::{CapabilitySet, Feature, HostStrategy, NotificationOptions, PermissionState};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::clients::{Clients, WindowClient};
use crate::error::HostError;
use crate::fetch::{FetchRequest, FetchResponse, Network, NetworkError};
use crate::notification::{
    LifecycleEvent, LifecycleListener, NativeNotification, NotificationHandle, NotificationHost,
    PermissionCallback, ServiceWorkerRegistration,
};

/// Scripted network that counts requests per URL.
///
/// Unrouted URLs answer 404.
#[derive(Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<String, Result<FetchResponse, NetworkError>>>,
    flaky: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`.
    pub fn route(&self, url: &str, status: u16, body: &[u8]) {
        self.routes
            .lock()
            .insert(url.to_string(), Ok(FetchResponse::new(status, body.to_vec()).with_url(url)));
    }

    /// Fail every fetch of `url`.
    pub fn fail(&self, url: &str, error: NetworkError) {
        self.routes.lock().insert(url.to_string(), Err(error));
    }

    /// Fail the next `times` fetches of `url`, then fall back to its route.
    pub fn fail_times(&self, url: &str, times: usize) {
        self.flaky.lock().insert(url.to_string(), times);
    }

    /// Fail every fetch while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fetches issued for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|u| *u == url).count()
    }

    /// Fetches issued overall.
    pub fn total_requests(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        self.requests.lock().push(request.url.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Offline(request.url.clone()));
        }

        if let Some(remaining) = self.flaky.lock().get_mut(&request.url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(NetworkError::Failed(format!("flaky {}", request.url)));
            }
        }

        self.routes
            .lock()
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Ok(FetchResponse::not_found().with_url(request.url.clone())))
    }
}

/// Window clients that record focus and open calls.
#[derive(Default)]
pub struct FakeClients {
    windows: Mutex<Vec<WindowClient>>,
    focused: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
    claims: AtomicUsize,
}

impl FakeClients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already open window.
    pub fn add_window(&self, id: &str, url: &str) {
        self.windows.lock().push(WindowClient {
            id: id.to_string(),
            url: url.to_string(),
            focused: false,
        });
    }

    /// Ids passed to `focus`, in call order.
    pub fn focused(&self) -> Vec<String> {
        self.focused.lock().clone()
    }

    /// URLs passed to `open_window`, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    /// Number of `claim` calls.
    pub fn claims(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clients for FakeClients {
    async fn match_all_windows(&self) -> Vec<WindowClient> {
        self.windows.lock().clone()
    }

    async fn focus(&self, client: &WindowClient) -> Result<WindowClient, HostError> {
        self.focused.lock().push(client.id.clone());
        let mut windows = self.windows.lock();
        for window in windows.iter_mut() {
            window.focused = window.id == client.id;
        }
        windows
            .iter()
            .find(|window| window.id == client.id)
            .cloned()
            .ok_or_else(|| HostError::Rejected(format!("no client {}", client.id)))
    }

    async fn open_window(&self, url: &str) -> Result<WindowClient, HostError> {
        self.opened.lock().push(url.to_string());
        let mut windows = self.windows.lock();
        let client = WindowClient {
            id: format!("window-{}", windows.len() + 1),
            url: url.to_string(),
            focused: true,
        };
        windows.push(client.clone());
        Ok(client)
    }

    async fn claim(&self) -> Result<(), HostError> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Registration that records every notification it is asked to show.
pub struct RecordingRegistration {
    scope: String,
    persistent: bool,
    failing: AtomicBool,
    shown: Mutex<Vec<(String, NotificationOptions)>>,
}

impl RecordingRegistration {
    pub fn new(scope: &str) -> Self {
        Self {
            scope: scope.to_string(),
            persistent: true,
            failing: AtomicBool::new(false),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// A registration on a host without persistent notifications.
    pub fn without_persistent(scope: &str) -> Self {
        Self {
            persistent: false,
            ..Self::new(scope)
        }
    }

    /// Make `show_notification` reject while set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything shown so far.
    pub fn shown(&self) -> Vec<(String, NotificationOptions)> {
        self.shown.lock().clone()
    }

    /// Titles shown so far.
    pub fn shown_titles(&self) -> Vec<String> {
        self.shown.lock().iter().map(|(title, _)| title.clone()).collect()
    }
}

#[async_trait]
impl ServiceWorkerRegistration for RecordingRegistration {
    fn scope(&self) -> &str {
        &self.scope
    }

    fn supports_persistent_notifications(&self) -> bool {
        self.persistent
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), HostError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HostError::Rejected("showNotification rejected".to_string()));
        }
        self.shown.lock().push((title.to_string(), options.clone()));
        Ok(())
    }
}

/// A displayed notification whose events are fired by the test.
pub struct FakeNotification {
    id: u64,
    title: String,
    tag: Option<String>,
    closed: AtomicBool,
    listeners: Mutex<Vec<LifecycleListener>>,
}

impl FakeNotification {
    pub fn new(title: &str, tag: Option<&str>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            tag: tag.map(str::to_string),
            closed: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Deliver `event` to every subscriber.
    pub fn fire(&self, event: LifecycleEvent) {
        for listener in self.listeners.lock().iter() {
            listener(event.clone());
        }
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl std::fmt::Debug for FakeNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeNotification")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl NativeNotification for FakeNotification {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn subscribe(&self, listener: LifecycleListener) {
        self.listeners.lock().push(listener);
    }
}

/// Scripted page host.
///
/// The prompt answer, the current permission, and whether the direct
/// primitive throws are all controlled by the test.
pub struct FakeNotificationHost {
    capabilities: CapabilitySet,
    legacy_prompt: bool,
    permission: Mutex<PermissionState>,
    prompt_answer: Mutex<PermissionState>,
    prompts: AtomicUsize,
    changes: Option<watch::Sender<PermissionState>>,
    show_failing: AtomicBool,
    shown: Mutex<Vec<(String, NotificationOptions)>>,
    notifications: Mutex<Vec<Arc<FakeNotification>>>,
    registration: Option<Arc<RecordingRegistration>>,
}

impl FakeNotificationHost {
    /// A host exposing `capabilities`, permission `default`.
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            legacy_prompt: capabilities.host_strategy == HostStrategy::LegacyCallback,
            permission: Mutex::new(PermissionState::Default),
            prompt_answer: Mutex::new(PermissionState::Granted),
            prompts: AtomicUsize::new(0),
            changes: None,
            show_failing: AtomicBool::new(false),
            shown: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            registration: None,
        }
    }

    /// Start with `state` already decided.
    pub fn with_permission(self, state: PermissionState) -> Self {
        *self.permission.lock() = state;
        if let Some(changes) = &self.changes {
            changes.send_replace(state);
        }
        self
    }

    /// What the user answers when prompted.
    pub fn with_prompt_answer(self, state: PermissionState) -> Self {
        *self.prompt_answer.lock() = state;
        self
    }

    /// Report permission changes push-style instead of requiring polling.
    pub fn with_push_permission_changes(mut self) -> Self {
        let (sender, _) = watch::channel(*self.permission.lock());
        self.changes = Some(sender);
        self
    }

    /// Hand out `registration` from `register_service_worker`.
    pub fn with_registration(mut self, registration: Arc<RecordingRegistration>) -> Self {
        self.registration = Some(registration);
        self
    }

    /// Change permission out of band, as OS settings would.
    pub fn set_permission(&self, state: PermissionState) {
        *self.permission.lock() = state;
        if let Some(changes) = &self.changes {
            changes.send_replace(state);
        }
    }

    /// Make the direct primitive throw while set.
    pub fn set_show_failing(&self, failing: bool) {
        self.show_failing.store(failing, Ordering::SeqCst);
    }

    /// How many prompts were shown.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Everything shown through the direct primitive.
    pub fn shown(&self) -> Vec<(String, NotificationOptions)> {
        self.shown.lock().clone()
    }

    /// The most recent notification created by the direct primitive.
    pub fn last_notification(&self) -> Option<Arc<FakeNotification>> {
        self.notifications.lock().last().cloned()
    }

    fn answer_prompt(&self) -> PermissionState {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let answer = *self.prompt_answer.lock();
        if answer != PermissionState::Default {
            self.set_permission(answer);
        }
        answer
    }
}

#[async_trait]
impl NotificationHost for FakeNotificationHost {
    fn probe(&self, feature: Feature) -> bool {
        self.capabilities.supports(feature)
    }

    fn uses_legacy_permission_callback(&self) -> bool {
        self.legacy_prompt
    }

    fn permission(&self) -> PermissionState {
        if !self.capabilities.basic {
            return PermissionState::Unsupported;
        }
        *self.permission.lock()
    }

    async fn request_permission(&self) -> Result<PermissionState, HostError> {
        if self.legacy_prompt {
            return Err(HostError::Unavailable("promise permission prompt".to_string()));
        }
        Ok(self.answer_prompt())
    }

    fn request_permission_with_callback(&self, callback: PermissionCallback) -> Result<(), HostError> {
        callback(self.answer_prompt());
        Ok(())
    }

    fn permission_changes(&self) -> Option<watch::Receiver<PermissionState>> {
        self.changes.as_ref().map(|changes| changes.subscribe())
    }

    fn show(&self, title: &str, options: &NotificationOptions) -> Result<NotificationHandle, HostError> {
        if self.show_failing.load(Ordering::SeqCst) {
            return Err(HostError::Threw("Illegal constructor".to_string()));
        }
        self.shown.lock().push((title.to_string(), options.clone()));
        let notification = Arc::new(FakeNotification::new(title, options.tag.as_deref()));
        self.notifications.lock().push(Arc::clone(&notification));
        Ok(notification)
    }

    async fn register_service_worker(
        &self,
        script_url: &str,
    ) -> Result<Arc<dyn ServiceWorkerRegistration>, HostError> {
        match &self.registration {
            Some(registration) => Ok(Arc::clone(registration) as Arc<dyn ServiceWorkerRegistration>),
            None => Err(HostError::Unavailable(format!("service worker {script_url}"))),
        }
    }
}
