//! cPanel DNS provider adapter

use async_trait::async_trait;

use crate::errors::{PlatformError, Result};
use crate::models::dns::RemoteDnsRecord;
use crate::ports::dns::DnsProviderPort;

/// cPanel adapter. Record management is not implemented yet; the provider
/// participates in configuration and discovery surfaces only.
pub struct CPanelProvider;

impl CPanelProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CPanelProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn unimplemented_error() -> PlatformError {
    PlatformError::Internal("cPanel provider not yet implemented".to_string())
}

#[async_trait]
impl DnsProviderPort for CPanelProvider {
    async fn create_record(
        &self,
        _name: &str,
        _record_type: &str,
        _content: &str,
        _proxied: bool,
    ) -> Result<String> {
        Err(unimplemented_error())
    }

    async fn update_record(
        &self,
        _name: &str,
        _record_id: &str,
        _record_type: &str,
        _content: &str,
        _proxied: bool,
    ) -> Result<()> {
        Err(unimplemented_error())
    }

    async fn delete_record(&self, _name: &str, _record_id: &str) -> Result<()> {
        Err(unimplemented_error())
    }

    async fn list_records(&self) -> Result<Vec<RemoteDnsRecord>> {
        Ok(vec![])
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        Err(unimplemented_error())
    }

    async fn setup_tunnel_ingress(
        &self,
        _tunnel_id: &str,
        _hostname: &str,
        _service_url: &str,
    ) -> Result<()> {
        Err(unimplemented_error())
    }

    async fn remove_tunnel_ingress(&self, _tunnel_id: &str, _hostname: &str) -> Result<()> {
        Err(unimplemented_error())
    }
}
