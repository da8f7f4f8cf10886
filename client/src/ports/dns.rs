//! DNS provider adapter contract

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::dns::RemoteDnsRecord;
use crate::models::domain::DnsProviderKind;

/// Capability interface over one configured DNS provider
#[async_trait]
pub trait DnsProviderPort: Send + Sync {
    /// Create a DNS record, returning the provider-side record ID
    async fn create_record(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<String>;

    /// Replace the content and proxy flag of an existing record
    async fn update_record(
        &self,
        name: &str,
        record_id: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<()>;

    /// Delete a record by its provider-side ID
    async fn delete_record(&self, name: &str, record_id: &str) -> Result<()>;

    /// All records across the provider's zones
    async fn list_records(&self) -> Result<Vec<RemoteDnsRecord>>;

    /// Zone names usable as base domains
    async fn list_zones(&self) -> Result<Vec<String>>;

    /// Route a hostname into a tunnel towards a service URL
    async fn setup_tunnel_ingress(
        &self,
        tunnel_id: &str,
        hostname: &str,
        service_url: &str,
    ) -> Result<()>;

    /// Remove a hostname from a tunnel's ingress rules
    async fn remove_tunnel_ingress(&self, tunnel_id: &str, hostname: &str) -> Result<()>;
}

/// Resolves a team's stored configuration into a usable provider adapter
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Build the configured adapter for a team and provider kind
    async fn provider(
        &self,
        team_id: &str,
        kind: DnsProviderKind,
    ) -> Result<Box<dyn DnsProviderPort>>;
}
