//! Origins and same-origin checks.
//!
//! The worker decides between same-origin and cross-origin caching policy by
//! comparing request origins against its own. Manifest entries may be
//! written origin-relative (`/app.js`); [`Origin::resolve`] turns them into
//! the absolute URLs used as cache keys.

use std::fmt;
use thiserror::Error;

/// Represents an origin tuple (scheme, host, port)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    /// URL scheme (e.g., "https", "http")
    pub scheme: String,
    /// Host (e.g., "example.com", "localhost")
    pub host: String,
    /// Port number (None means default port for scheme)
    pub port: Option<u16>,
}

/// Errors that can occur during origin operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    /// The URL has no usable scheme/host
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The origin is opaque (`null`)
    #[error("opaque origin")]
    Opaque,
}

impl Origin {
    /// Create a new origin
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.into().to_lowercase(),
            host: host.into().to_lowercase(),
            port,
        }
    }

    /// Parse an origin from a URL string
    pub fn parse(url: &str) -> Result<Self, OriginError> {
        let url = url.trim();
        if url == "null" {
            return Err(OriginError::Opaque);
        }

        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| OriginError::InvalidUrl(format!("missing scheme in '{url}'")))?;

        let authority = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(rest);
        let host_port = match authority.split_once('@') {
            Some((_userinfo, host_port)) => host_port,
            None => authority,
        };

        let (host, port) = if host_port.starts_with('[') {
            if let Some((ipv6, port)) = host_port.rsplit_once("]:") {
                (format!("{ipv6}]"), Some(parse_port(port)?))
            } else if host_port.ends_with(']') {
                (host_port.to_string(), None)
            } else {
                return Err(OriginError::InvalidUrl("malformed IPv6 address".to_string()));
            }
        } else if let Some((host, port)) = host_port.rsplit_once(':') {
            (host.to_string(), Some(parse_port(port)?))
        } else {
            (host_port.to_string(), None)
        };

        if host.is_empty() {
            return Err(OriginError::InvalidUrl(format!("empty host in '{url}'")));
        }

        Ok(Origin::new(scheme, host, port))
    }

    /// Get the effective port (resolving default ports)
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| default_port(&self.scheme))
    }

    /// Same scheme, host and effective port.
    pub fn is_same_origin(&self, other: &Origin) -> bool {
        self.scheme == other.scheme
            && self.host == other.host
            && self.effective_port() == other.effective_port()
    }

    /// True when `url` is absolute and same-origin with `self`, or
    /// origin-relative (starts with `/`).
    pub fn is_same_origin_url(&self, url: &str) -> bool {
        if url.starts_with('/') && !url.starts_with("//") {
            return true;
        }
        Origin::parse(url)
            .map(|other| self.is_same_origin(&other))
            .unwrap_or(false)
    }

    /// Absolute form of an origin-relative path. Absolute URLs are returned
    /// unchanged.
    pub fn resolve(&self, url: &str) -> String {
        if url.contains("://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.serialize(), url)
        } else {
            format!("{}/{}", self.serialize(), url)
        }
    }

    /// Serialize origin to string, omitting default ports
    pub fn serialize(&self) -> String {
        match self.port {
            Some(port) if port != default_port(&self.scheme) => {
                format!("{}://{}:{}", self.scheme, self.host, port)
            }
            _ => format!("{}://{}", self.scheme, self.host),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn parse_port(port: &str) -> Result<u16, OriginError> {
    port.parse::<u16>()
        .map_err(|_| OriginError::InvalidUrl(format!("invalid port '{port}'")))
}

/// Default ports for common schemes
fn default_port(scheme: &str) -> u16 {
    match scheme {
        "http" | "ws" => 80,
        "https" | "wss" => 443,
        _ => 0,
    }
}
