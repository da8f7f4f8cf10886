//! Domain and DNS configuration endpoints

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;
use crate::http::client::HttpClient;
use crate::models::dns::DnsProviderConfig;
use crate::models::domain::{DnsProviderKind, DomainRecord};
use crate::ports::store::{DnsConfigStore, DomainStore};

#[derive(Debug, Serialize)]
struct VerifiedUpdate {
    verified: bool,
}

#[derive(Debug, Serialize)]
struct BrandingUpdate {
    show_branding: bool,
}

#[derive(Debug, Serialize)]
struct DnsRecordIdUpdate<'a> {
    dns_record_id: Option<&'a str>,
}

#[async_trait]
impl DomainStore for HttpClient {
    async fn create(&self, record: &DomainRecord) -> Result<DomainRecord> {
        self.post(&format!("/stacks/{}/domains", record.stack_id), record)
            .await
    }

    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DomainRecord>> {
        self.get(&format!("/domains/{}", hostname)).await
    }

    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<DomainRecord>> {
        self.get(&format!("/stacks/{}/domains", stack_id)).await
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DomainRecord>> {
        self.get(&format!("/teams/{}/domains", team_id)).await
    }

    async fn list_all(&self) -> Result<Vec<DomainRecord>> {
        self.get("/domains").await
    }

    async fn set_verified(&self, hostname: &str, verified: bool) -> Result<()> {
        let _: serde_json::Value = self
            .patch(
                &format!("/domains/{}/verified", hostname),
                &VerifiedUpdate { verified },
            )
            .await?;
        Ok(())
    }

    async fn set_branding(&self, hostname: &str, show: bool) -> Result<()> {
        let _: serde_json::Value = self
            .patch(
                &format!("/domains/{}/branding", hostname),
                &BrandingUpdate { show_branding: show },
            )
            .await?;
        Ok(())
    }

    async fn set_dns_record_id(&self, hostname: &str, record_id: Option<&str>) -> Result<()> {
        let _: serde_json::Value = self
            .patch(
                &format!("/domains/{}/dns-record", hostname),
                &DnsRecordIdUpdate {
                    dns_record_id: record_id,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, hostname: &str) -> Result<()> {
        self.delete(&format!("/domains/{}", hostname)).await
    }
}

#[async_trait]
impl DnsConfigStore for HttpClient {
    async fn find(
        &self,
        team_id: &str,
        provider: DnsProviderKind,
    ) -> Result<Option<DnsProviderConfig>> {
        self.get(&format!("/teams/{}/dns-configs/{}", team_id, provider))
            .await
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DnsProviderConfig>> {
        self.get(&format!("/teams/{}/dns-configs", team_id)).await
    }

    async fn save(&self, config: &DnsProviderConfig) -> Result<DnsProviderConfig> {
        self.put(
            &format!("/teams/{}/dns-configs/{}", config.team_id, config.provider),
            config,
        )
        .await
    }

    async fn delete(&self, team_id: &str, provider: DnsProviderKind) -> Result<()> {
        self.delete(&format!("/teams/{}/dns-configs/{}", team_id, provider))
            .await
    }
}
