//! Reverse-proxy routing contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One hostname-to-upstream route held by the reverse proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRoute {
    /// Hostname the route matches
    pub hostname: String,

    /// Upstream address (container:port)
    pub upstream: String,

    /// Whether platform branding is injected into responses
    pub show_branding: bool,
}

/// Route table of the reverse proxy
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Create or replace the route for a hostname
    async fn register_route(&self, route: &ProxyRoute) -> Result<()>;

    /// Drop the route for a hostname; absent routes are not an error
    async fn deregister_route(&self, hostname: &str) -> Result<()>;

    /// The current route table
    async fn routes(&self) -> Result<Vec<ProxyRoute>>;
}
