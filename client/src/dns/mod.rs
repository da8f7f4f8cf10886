//! DNS provider adapters and configuration

pub mod cloudflare;
pub mod cpanel;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{PlatformError, Result};
use crate::models::dns::{CloudflareConfig, DnsProviderConfig};
use crate::models::domain::DnsProviderKind;
use crate::ports::dns::{DnsProviderPort, ProviderFactory};
use crate::ports::store::DnsConfigStore;

pub use cloudflare::CloudflareProvider;
pub use cpanel::CPanelProvider;

/// Resolves a team's provider configuration into a usable adapter and owns
/// the configuration CRUD. A config change only affects adapters built after
/// the save; in-flight operations keep the adapter they started with.
pub struct ProviderRegistry {
    configs: Arc<dyn DnsConfigStore>,
}

impl ProviderRegistry {
    pub fn new(configs: Arc<dyn DnsConfigStore>) -> Self {
        Self { configs }
    }

    /// All configurations of a team
    pub async fn list_configs(&self, team_id: &str) -> Result<Vec<DnsProviderConfig>> {
        self.configs.list_by_team(team_id).await
    }

    /// Create or replace a team's provider configuration. The payload is
    /// validated per provider before anything is stored.
    pub async fn save_config(
        &self,
        team_id: &str,
        kind: DnsProviderKind,
        payload: serde_json::Value,
    ) -> Result<DnsProviderConfig> {
        match kind {
            DnsProviderKind::Custom => {
                return Err(PlatformError::Validation(
                    "Custom provider does not take a configuration".to_string(),
                ));
            }
            DnsProviderKind::Cloudflare => {
                let parsed: CloudflareConfig = serde_json::from_value(payload.clone())
                    .map_err(|e| {
                        PlatformError::Validation(format!("Invalid Cloudflare config: {}", e))
                    })?;
                if parsed.api_token.is_empty() {
                    return Err(PlatformError::Validation(
                        "Cloudflare API token must not be empty".to_string(),
                    ));
                }
            }
            DnsProviderKind::CPanel => {}
        }

        let now = Utc::now();
        let config = DnsProviderConfig {
            id: Uuid::new_v4().to_string(),
            team_id: team_id.to_string(),
            provider: kind,
            config: payload,
            created_at: now,
            updated_at: now,
        };

        self.configs.save(&config).await
    }

    /// Delete a team's provider configuration
    pub async fn remove_config(&self, team_id: &str, kind: DnsProviderKind) -> Result<()> {
        self.configs.delete(team_id, kind).await
    }
}

#[async_trait]
impl ProviderFactory for ProviderRegistry {
    async fn provider(
        &self,
        team_id: &str,
        kind: DnsProviderKind,
    ) -> Result<Box<dyn DnsProviderPort>> {
        match kind {
            DnsProviderKind::Custom => Err(PlatformError::Validation(
                "Custom provider does not support automated DNS".to_string(),
            )),
            DnsProviderKind::Cloudflare => {
                let config = self
                    .configs
                    .find(team_id, DnsProviderKind::Cloudflare)
                    .await?
                    .ok_or_else(|| {
                        PlatformError::NotFound(
                            "Cloudflare configuration not found for team".to_string(),
                        )
                    })?;

                let parsed: CloudflareConfig =
                    serde_json::from_value(config.config).map_err(|e| {
                        PlatformError::Internal(format!("Invalid Cloudflare config: {}", e))
                    })?;

                Ok(Box::new(CloudflareProvider::new(parsed)))
            }
            DnsProviderKind::CPanel => Ok(Box::new(CPanelProvider::new())),
        }
    }
}
