//! Persistence contracts (durable store owned by the backend)

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::deployment::{AttemptStatus, DeploymentAttempt, NewAttempt};
use crate::models::dns::DnsProviderConfig;
use crate::models::domain::{DnsProviderKind, DomainRecord};
use crate::models::resource::ResourceLimit;
use crate::models::stack::{AutomationPolicy, Stack, StackStatus};

/// Stack persistence
#[async_trait]
pub trait StackStore: Send + Sync {
    /// Fetch a stack by ID
    async fn get(&self, stack_id: &str) -> Result<Stack>;

    /// List stacks owned by a team
    async fn list_by_team(&self, team_id: &str) -> Result<Vec<Stack>>;

    /// Persist new compose content as the desired state
    async fn update_compose(&self, stack_id: &str, compose: &str) -> Result<()>;

    /// Persist a status transition
    async fn update_status(&self, stack_id: &str, status: StackStatus) -> Result<()>;

    /// Replace the automation policy
    async fn update_automation(&self, stack_id: &str, policy: &AutomationPolicy) -> Result<()>;

    /// Record the commit hash resolved by the last git sync
    async fn update_git_state(&self, stack_id: &str, commit: &str) -> Result<()>;

    /// Record the last known stable image set
    async fn update_stable_images(
        &self,
        stack_id: &str,
        images: &BTreeMap<String, String>,
    ) -> Result<()>;

    /// Atomically invalidate the current webhook token and issue a new one
    async fn rotate_webhook_token(&self, stack_id: &str) -> Result<String>;

    /// Delete the stack and everything it owns
    async fn delete(&self, stack_id: &str) -> Result<()>;
}

/// Deployment attempt log. Append-only: finished attempts are never mutated
/// except to attach logs.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Append a new attempt in pending state
    async fn append(&self, new: NewAttempt) -> Result<DeploymentAttempt>;

    /// Finish an open attempt, optionally attaching captured logs
    async fn finish(
        &self,
        attempt_id: &str,
        status: AttemptStatus,
        logs: Option<&str>,
    ) -> Result<DeploymentAttempt>;

    /// Attempts for a stack, most recent first
    async fn list_by_stack(&self, stack_id: &str, limit: u32) -> Result<Vec<DeploymentAttempt>>;

    /// The open (pending or running) attempt for a stack, if any
    async fn find_open(&self, stack_id: &str) -> Result<Option<DeploymentAttempt>>;
}

/// Domain record persistence
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Store a new record
    async fn create(&self, record: &DomainRecord) -> Result<DomainRecord>;

    /// Look a record up by hostname, across all stacks
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DomainRecord>>;

    /// Records bound to one stack
    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<DomainRecord>>;

    /// Records across every stack of a team
    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DomainRecord>>;

    /// Every record in the system; input to drift reconciliation
    async fn list_all(&self) -> Result<Vec<DomainRecord>>;

    /// Persist the outcome of a verification check
    async fn set_verified(&self, hostname: &str, verified: bool) -> Result<()>;

    /// Flip the branding visibility flag
    async fn set_branding(&self, hostname: &str, show: bool) -> Result<()>;

    /// Record or clear the provider-side record ID
    async fn set_dns_record_id(&self, hostname: &str, record_id: Option<&str>) -> Result<()>;

    /// Delete a record by hostname
    async fn delete(&self, hostname: &str) -> Result<()>;
}

/// Resource limit persistence
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Limits configured for a stack
    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<ResourceLimit>>;

    /// Create or replace the limit for one service
    async fn upsert(&self, limit: &ResourceLimit) -> Result<ResourceLimit>;

    /// Remove the limit for one service
    async fn remove(&self, stack_id: &str, service_name: &str) -> Result<()>;
}

/// DNS provider configuration persistence; at most one config per
/// (team, provider) pair
#[async_trait]
pub trait DnsConfigStore: Send + Sync {
    /// Configuration for one provider of a team
    async fn find(
        &self,
        team_id: &str,
        provider: DnsProviderKind,
    ) -> Result<Option<DnsProviderConfig>>;

    /// All configurations of a team
    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DnsProviderConfig>>;

    /// Create or replace a configuration
    async fn save(&self, config: &DnsProviderConfig) -> Result<DnsProviderConfig>;

    /// Delete a configuration
    async fn delete(&self, team_id: &str, provider: DnsProviderKind) -> Result<()>;
}
