//! Git source contract

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::stack::GitSource;

/// Operations against a stack's git source
#[async_trait]
pub trait GitPort: Send + Sync {
    /// Resolve the head commit hash of a branch
    async fn resolve_head(&self, url: &str, branch: &str) -> Result<String>;

    /// Fetch the compose file content at the branch head
    async fn fetch_compose(&self, source: &GitSource) -> Result<String>;
}
