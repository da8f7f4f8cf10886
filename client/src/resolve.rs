//! Hostname resolver used for domain verification

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::errors::Result;
use crate::ports::resolve::ResolverPort;

/// `ResolverPort` implementation on the system's configured resolver
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    pub fn new() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResolverPort for DnsResolver {
    async fn lookup_a(&self, hostname: &str) -> Result<Vec<String>> {
        let records = match self.resolver.lookup_ip(hostname).await {
            Ok(lookup) => lookup.iter().map(|ip| ip.to_string()).collect(),
            Err(_) => vec![],
        };
        Ok(records)
    }

    async fn lookup_cname(&self, hostname: &str) -> Result<Vec<String>> {
        let records = match self
            .resolver
            .lookup(hostname, hickory_resolver::proto::rr::RecordType::CNAME)
            .await
        {
            Ok(lookup) => lookup
                .iter()
                .filter_map(|r| r.clone().into_cname().ok())
                .map(|cname| cname.to_string().trim_end_matches('.').to_string())
                .collect(),
            Err(_) => vec![],
        };
        Ok(records)
    }
}
