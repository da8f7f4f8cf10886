//! Hostname resolution contract used for verification

use async_trait::async_trait;

use crate::errors::Result;

/// Read-only DNS lookups; failures to resolve are empty results, not errors
#[async_trait]
pub trait ResolverPort: Send + Sync {
    /// A record addresses for a hostname
    async fn lookup_a(&self, hostname: &str) -> Result<Vec<String>>;

    /// CNAME targets for a hostname, trailing dots trimmed
    async fn lookup_cname(&self, hostname: &str) -> Result<Vec<String>>;
}
