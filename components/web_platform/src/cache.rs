//! Cache Storage: named generations of cached responses.
//!
//! The store is shared between the foreground and the worker and between
//! concurrent fetch handlers inside the worker. Writes for the same key are
//! last-writer-wins; no operation holds a lock across an await point.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::fetch::{FetchRequest, FetchResponse};

/// Why a response could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Partial content is never cached
    #[error("cannot cache partial responses (206)")]
    PartialResponse,
    /// Network-error responses are never cached
    #[error("cannot cache network-error responses")]
    ErrorResponse,
}

/// A single cache in the Cache Storage
pub struct Cache {
    /// Cache name
    name: String,
    /// Cached entries (URL -> Response)
    entries: RwLock<HashMap<String, FetchResponse>>,
}

impl Cache {
    fn new(name: String) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the cache name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Match a request against the cache
    pub fn match_request(&self, request: &FetchRequest) -> Option<FetchResponse> {
        self.match_url(&request.url)
    }

    /// Match a URL against the cache
    pub fn match_url(&self, url: &str) -> Option<FetchResponse> {
        self.entries.read().get(url).cloned()
    }

    /// Store a response for `request`, replacing any previous entry.
    pub fn put(&self, request: &FetchRequest, response: FetchResponse) -> Result<(), CacheError> {
        self.put_url(&request.url, response)
    }

    /// Store a response under a URL key.
    pub fn put_url(&self, url: &str, response: FetchResponse) -> Result<(), CacheError> {
        if response.status == 206 {
            return Err(CacheError::PartialResponse);
        }
        if response.is_error() {
            return Err(CacheError::ErrorResponse);
        }
        self.entries.write().insert(url.to_string(), response);
        Ok(())
    }

    /// Delete a cached entry
    pub fn delete(&self, request: &FetchRequest) -> bool {
        self.entries.write().remove(&request.url).is_some()
    }

    /// Cached request URLs, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.name)
            .field("entry_count", &self.len())
            .finish()
    }
}

/// Cache Storage API
#[derive(Default)]
pub struct CacheStorage {
    caches: RwLock<HashMap<String, Arc<Cache>>>,
}

impl CacheStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a cache (creates if doesn't exist)
    pub fn open(&self, name: &str) -> Arc<Cache> {
        let mut caches = self.caches.write();
        Arc::clone(
            caches
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Cache::new(name.to_string()))),
        )
    }

    /// Look up an existing cache without creating it
    pub fn get(&self, name: &str) -> Option<Arc<Cache>> {
        self.caches.read().get(name).cloned()
    }

    /// Check if a cache exists
    pub fn has(&self, name: &str) -> bool {
        self.caches.read().contains_key(name)
    }

    /// Delete a cache
    pub fn delete(&self, name: &str) -> bool {
        self.caches.write().remove(name).is_some()
    }

    /// All cache names, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for CacheStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStorage")
            .field("cache_count", &self.caches.read().len())
            .finish()
    }
}
