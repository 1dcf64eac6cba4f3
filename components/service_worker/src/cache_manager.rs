//! Cache generations and fetch strategies.
//!
//! One generation, named by [`WorkerConfig::cache_name`], is active at a
//! time. Install fills it from the manifest, activate deletes every other
//! generation, and fetch handling serves from it:
//!
//! - same-origin `GET`: cache first, network fallback, successful network
//!   responses written back; offline navigations get the offline document
//! - configured external resources: cache first, CORS network fallback,
//!   an empty 404 when both miss
//! - everything else passes through to the network untouched

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::task::JoinHandle;
use web_platform::{
    Cache, CacheStatus, CacheStorage, FetchRequest, FetchResponse, Network, Origin, RequestMethod,
    RequestMode, ServiceWorkerState,
};

use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};

// ============================================================================
// Reports
// ============================================================================

/// What an install managed to cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Local resources now in the generation
    pub cached: Vec<String>,
    /// Local resources that failed every attempt
    pub failed: Vec<String>,
}

impl InstallReport {
    /// True when every local resource was cached.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The fetch handler's decision for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The worker answers with this response
    Respond(FetchResponse),
    /// Not intercepted; the host performs the request itself
    Passthrough,
}

impl FetchOutcome {
    /// The response, when the worker answered.
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            FetchOutcome::Respond(response) => Some(response),
            FetchOutcome::Passthrough => None,
        }
    }
}

// ============================================================================
// Cache Manager
// ============================================================================

/// Worker-side cache lifecycle and fetch strategy.
pub struct CacheManager {
    config: WorkerConfig,
    origin: Origin,
    storage: Arc<CacheStorage>,
    network: Arc<dyn Network>,
    state: RwLock<ServiceWorkerState>,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl CacheManager {
    /// Create a manager for `config` over shared cache storage.
    pub fn new(config: WorkerConfig, storage: Arc<CacheStorage>, network: Arc<dyn Network>) -> Result<Self> {
        let origin = config.parsed_origin()?;
        Ok(Self {
            config,
            origin,
            storage,
            network,
            state: RwLock::new(ServiceWorkerState::Parsed),
            background: Mutex::new(Vec::new()),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceWorkerState {
        *self.state.read()
    }

    /// Name of the active generation.
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    /// The worker's origin.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Configuration in use.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The shared cache store.
    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    fn transition(&self, next: ServiceWorkerState) -> Result<()> {
        let mut state = self.state.write();
        if !state.can_transition_to(next) {
            return Err(WorkerError::InvalidTransition { from: *state, to: next });
        }
        let from = *state;
        tracing::debug!(%from, to = %next, "worker state change");
        *state = next;
        Ok(())
    }

    fn current_generation(&self) -> Arc<Cache> {
        self.storage.open(&self.config.cache_name)
    }

    /// Populate the generation from the manifest.
    ///
    /// Each local resource is fetched on its own with up to
    /// `install_attempts` tries; failures are reported, not fatal. External
    /// resources are cached in the background and never delay install.
    pub async fn install(&self) -> Result<InstallReport> {
        self.transition(ServiceWorkerState::Installing)?;
        tracing::info!(cache = %self.config.cache_name, "caching application resources");

        let cache = self.current_generation();
        let mut report = InstallReport::default();
        for resource in &self.config.local_resources {
            if self.cache_local(&cache, resource).await {
                report.cached.push(resource.clone());
            } else {
                report.failed.push(resource.clone());
            }
        }
        if !report.is_complete() {
            tracing::warn!(failed = ?report.failed, "some resources could not be cached");
        }

        if !self.config.external_resources.is_empty() {
            let task = tokio::spawn(cache_external(
                Arc::clone(&self.network),
                cache,
                self.config.external_resources.clone(),
            ));
            self.background.lock().push(task);
        }

        self.transition(ServiceWorkerState::Installed)?;
        Ok(report)
    }

    async fn cache_local(&self, cache: &Cache, resource: &str) -> bool {
        let request = FetchRequest::get(self.origin.resolve(resource));
        let attempts = self.config.install_attempts.max(1);
        for attempt in 1..=attempts {
            match self.network.fetch(&request).await {
                Ok(response) if response.ok() => match cache.put(&request, response) {
                    Ok(()) => return true,
                    Err(err) => {
                        tracing::warn!(url = %request.url, error = %err, "response not cacheable");
                        return false;
                    }
                },
                Ok(response) => {
                    tracing::debug!(url = %request.url, status = response.status, attempt, "bad status while caching");
                }
                Err(err) => {
                    tracing::debug!(url = %request.url, error = %err, attempt, "fetch failed while caching");
                }
            }
        }
        false
    }

    /// Wait for background external caching started by `install`.
    pub async fn settle(&self) {
        let tasks: Vec<JoinHandle<()>> = self.background.lock().drain(..).collect();
        for task in tasks {
            let _ = task.await;
        }
    }

    /// Make this generation the only one. Returns the deleted names.
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.transition(ServiceWorkerState::Activating)?;

        let mut deleted = Vec::new();
        for name in self.storage.keys() {
            if name != self.config.cache_name && self.storage.delete(&name) {
                tracing::info!(cache = %name, "deleting old cache generation");
                deleted.push(name);
            }
        }

        self.transition(ServiceWorkerState::Activated)?;
        tracing::info!(cache = %self.config.cache_name, "worker activated");
        Ok(deleted)
    }

    /// Answer an intercepted request.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchOutcome {
        if !self.state().can_intercept_fetch() || request.method != RequestMethod::Get {
            return FetchOutcome::Passthrough;
        }

        if self.origin.is_same_origin_url(&request.url) {
            let request = FetchRequest {
                url: self.origin.resolve(&request.url),
                ..request.clone()
            };
            FetchOutcome::Respond(self.same_origin(&request).await)
        } else if self.config.external_resources.contains(&request.url) {
            FetchOutcome::Respond(self.external(request).await)
        } else {
            FetchOutcome::Passthrough
        }
    }

    async fn same_origin(&self, request: &FetchRequest) -> FetchResponse {
        let cache = self.current_generation();
        if let Some(cached) = cache.match_request(request) {
            tracing::trace!(url = %request.url, "served from cache");
            return cached;
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                write_back(&cache, request, &response);
                response
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "fetch failed");
                if request.is_navigation() {
                    let offline = self.origin.resolve(&self.config.offline_document);
                    cache.match_url(&offline).unwrap_or_else(FetchResponse::error)
                } else {
                    FetchResponse::error()
                }
            }
        }
    }

    async fn external(&self, request: &FetchRequest) -> FetchResponse {
        let cache = self.current_generation();
        if let Some(cached) = cache.match_request(request) {
            return cached;
        }

        let request = request.clone().with_mode(RequestMode::Cors);
        match self.network.fetch(&request).await {
            Ok(response) => {
                write_back(&cache, &request, &response);
                response
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "external fetch failed");
                FetchResponse::not_found()
            }
        }
    }

    /// Name, size and URLs of the active generation.
    pub fn status(&self) -> CacheStatus {
        let urls = self
            .storage
            .get(&self.config.cache_name)
            .map(|cache| cache.keys())
            .unwrap_or_default();
        CacheStatus {
            name: self.config.cache_name.clone(),
            size: urls.len(),
            urls,
        }
    }

    /// Delete every generation. Returns the deleted names.
    pub fn clear(&self) -> Vec<String> {
        let deleted: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|name| self.storage.delete(name))
            .collect();
        tracing::info!(count = deleted.len(), "all caches cleared");
        deleted
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        for task in self.background.lock().drain(..) {
            task.abort();
        }
    }
}

/// Read-through population: only plain 200s are stored.
fn write_back(cache: &Cache, request: &FetchRequest, response: &FetchResponse) {
    if response.status != 200 {
        return;
    }
    if let Err(err) = cache.put(request, response.clone()) {
        tracing::warn!(url = %request.url, error = %err, "could not store response");
    }
}

async fn cache_external(network: Arc<dyn Network>, cache: Arc<Cache>, resources: Vec<String>) {
    for url in resources {
        let request = FetchRequest::get(url).with_mode(RequestMode::Cors);
        match network.fetch(&request).await {
            Ok(response) if response.ok() => {
                if let Err(err) = cache.put(&request, response) {
                    tracing::debug!(url = %request.url, error = %err, "external resource not cached");
                }
            }
            Ok(response) => {
                tracing::debug!(url = %request.url, status = response.status, "external resource not cached");
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "external resource not cached");
            }
        }
    }
}
