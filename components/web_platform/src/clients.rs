//! Window clients as seen from the worker.

use async_trait::async_trait;

use crate::error::HostError;

/// A top-level window the worker can focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    /// Host-assigned client id
    pub id: String,
    /// Current URL of the window
    pub url: String,
    /// Whether the window currently has focus
    pub focused: bool,
}

/// The worker's view of the windows it can reach.
#[async_trait]
pub trait Clients: Send + Sync {
    /// Every window client, including ones this worker does not control yet.
    async fn match_all_windows(&self) -> Vec<WindowClient>;

    /// Bring `client` to the foreground.
    async fn focus(&self, client: &WindowClient) -> Result<WindowClient, HostError>;

    /// Open a new window at `url`.
    async fn open_window(&self, url: &str) -> Result<WindowClient, HostError>;

    /// Take control of all open clients without a reload.
    async fn claim(&self) -> Result<(), HostError>;
}
