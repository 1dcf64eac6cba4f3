//! Request/response model for worker fetch interception.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Head => "HEAD",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Patch => "PATCH",
        };
        f.write_str(name)
    }
}

/// Request mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    NoCors,
    Cors,
}

/// Request destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDestination {
    Document,
    Script,
    Style,
    Image,
    Font,
    Unknown,
}

/// A request as seen by the worker's fetch handler
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Absolute request URL
    pub url: String,
    /// HTTP method
    pub method: RequestMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request mode
    pub mode: RequestMode,
    /// Request destination
    pub destination: RequestDestination,
}

impl FetchRequest {
    /// Create a new fetch request
    pub fn new(url: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            mode: RequestMode::Cors,
            destination: RequestDestination::Unknown,
        }
    }

    /// Create a GET request for a subresource
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, RequestMethod::Get)
    }

    /// Create a navigation request
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            mode: RequestMode::Navigate,
            destination: RequestDestination::Document,
            ..Self::get(url)
        }
    }

    /// Same request with a different mode
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// True for top-level document loads
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate || self.destination == RequestDestination::Document
    }
}

/// Response types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    Basic,
    Cors,
    Default,
    Error,
    Opaque,
}

/// A fetch response
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// Response status code
    pub status: u16,
    /// Status text
    pub status_text: String,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: Vec<u8>,
    /// Response type
    pub response_type: ResponseType,
    /// Response URL
    pub url: String,
}

impl FetchResponse {
    /// Create a new response
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: status_text(status).to_string(),
            headers: HashMap::new(),
            body,
            response_type: ResponseType::Default,
            url: String::new(),
        }
    }

    /// Network-error response
    pub fn error() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: HashMap::new(),
            body: Vec::new(),
            response_type: ResponseType::Error,
            url: String::new(),
        }
    }

    /// Empty 404, used where a failed cross-origin fetch must still resolve
    pub fn not_found() -> Self {
        Self::new(404, Vec::new())
    }

    /// Same response tagged with the URL it answered
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Same response with a different type
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Check if the response is OK (status 200-299)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for a network-error response
    pub fn is_error(&self) -> bool {
        self.response_type == ResponseType::Error
    }
}

/// Get status text for common status codes
fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        304 => "Not Modified",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// A fetch that never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// No connectivity
    #[error("network unreachable: {0}")]
    Offline(String),
    /// Cross-origin request rejected
    #[error("blocked by CORS: {0}")]
    Cors(String),
    /// Anything else the transport reports
    #[error("fetch failed: {0}")]
    Failed(String),
}

/// The network layer behind the worker.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform `request`. Non-2xx statuses are responses, not errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}
