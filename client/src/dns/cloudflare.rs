//! Cloudflare DNS provider adapter

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::{PlatformError, Result};
use crate::models::dns::{CloudflareConfig, RemoteDnsRecord};
use crate::ports::dns::DnsProviderPort;

const API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Adapter over the Cloudflare v4 API
pub struct CloudflareProvider {
    api_token: SecretString,
    account_id: Option<String>,
    client: reqwest::Client,
}

struct Zone {
    id: String,
    name: String,
}

impl CloudflareProvider {
    pub fn new(config: CloudflareConfig) -> Self {
        Self {
            api_token: SecretString::from(config.api_token),
            account_id: config.account_id,
            client: reqwest::Client::new(),
        }
    }

    /// Send a request and parse the enveloped `result` payload
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<serde_json::Value> {
        let response = builder
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::RemoteUnavailable(format!(
                "Cloudflare API error ({}): {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(body["result"].clone())
    }

    async fn fetch_zones(&self) -> Result<Vec<Zone>> {
        let result = self
            .send(self.client.get(format!("{}/zones?status=active", API_BASE)))
            .await?;

        let zones = result
            .as_array()
            .ok_or_else(|| {
                PlatformError::Internal("Cloudflare response missing zones list".to_string())
            })?
            .iter()
            .filter_map(|z| {
                Some(Zone {
                    id: z["id"].as_str()?.to_string(),
                    name: z["name"].as_str()?.to_string(),
                })
            })
            .collect();

        Ok(zones)
    }

    /// Longest-suffix zone match for a hostname
    async fn zone_for(&self, hostname: &str) -> Result<Zone> {
        let mut best: Option<Zone> = None;
        for zone in self.fetch_zones().await? {
            let matches = hostname == zone.name || hostname.ends_with(&format!(".{}", zone.name));
            if matches && best.as_ref().is_none_or(|b| zone.name.len() > b.name.len()) {
                best = Some(zone);
            }
        }

        best.ok_or_else(|| {
            PlatformError::Validation(format!(
                "No active Cloudflare zone found for hostname: {}",
                hostname
            ))
        })
    }

    fn account_id(&self) -> Result<&str> {
        self.account_id.as_deref().ok_or_else(|| {
            PlatformError::Validation(
                "Cloudflare account ID is required for tunnel ingress management".to_string(),
            )
        })
    }

    async fn tunnel_ingress(&self, account_id: &str, tunnel_id: &str) -> Result<Vec<serde_json::Value>> {
        let result = self
            .send(self.client.get(format!(
                "{}/accounts/{}/cfd_tunnel/{}/configurations",
                API_BASE, account_id, tunnel_id
            )))
            .await?;

        Ok(result["config"]["ingress"].as_array().cloned().unwrap_or_default())
    }

    async fn put_tunnel_ingress(
        &self,
        account_id: &str,
        tunnel_id: &str,
        ingress: Vec<serde_json::Value>,
    ) -> Result<()> {
        debug!("Updating tunnel {} ingress ({} rules)", tunnel_id, ingress.len());
        self.send(
            self.client
                .put(format!(
                    "{}/accounts/{}/cfd_tunnel/{}/configurations",
                    API_BASE, account_id, tunnel_id
                ))
                .json(&serde_json::json!({ "config": { "ingress": ingress } })),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DnsProviderPort for CloudflareProvider {
    async fn create_record(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<String> {
        let zone = self.zone_for(name).await?;
        let result = self
            .send(
                self.client
                    .post(format!("{}/zones/{}/dns_records", API_BASE, zone.id))
                    .json(&serde_json::json!({
                        "type": record_type,
                        "name": name,
                        "content": content,
                        "ttl": 1, // Auto
                        "proxied": proxied
                    })),
            )
            .await?;

        result["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                PlatformError::Internal("Cloudflare response missing record ID".to_string())
            })
    }

    async fn update_record(
        &self,
        name: &str,
        record_id: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<()> {
        let zone = self.zone_for(name).await?;
        self.send(
            self.client
                .put(format!("{}/zones/{}/dns_records/{}", API_BASE, zone.id, record_id))
                .json(&serde_json::json!({
                    "type": record_type,
                    "name": name,
                    "content": content,
                    "ttl": 1, // Auto
                    "proxied": proxied
                })),
        )
        .await?;
        Ok(())
    }

    async fn delete_record(&self, name: &str, record_id: &str) -> Result<()> {
        let zone = self.zone_for(name).await?;
        self.send(
            self.client
                .delete(format!("{}/zones/{}/dns_records/{}", API_BASE, zone.id, record_id)),
        )
        .await?;
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<RemoteDnsRecord>> {
        let mut all_records = Vec::new();

        for zone in self.fetch_zones().await? {
            let result = match self
                .send(self.client.get(format!("{}/zones/{}/dns_records", API_BASE, zone.id)))
                .await
            {
                Ok(r) => r,
                Err(_) => continue, // Skip unreadable zones
            };

            if let Some(records) = result.as_array() {
                for r in records {
                    all_records.push(RemoteDnsRecord {
                        id: r["id"].as_str().unwrap_or_default().to_string(),
                        name: r["name"].as_str().unwrap_or_default().to_string(),
                        record_type: r["type"].as_str().unwrap_or_default().to_string(),
                        content: r["content"].as_str().unwrap_or_default().to_string(),
                        zone_id: zone.id.clone(),
                        zone_name: zone.name.clone(),
                        proxied: r["proxied"].as_bool(),
                    });
                }
            }
        }

        Ok(all_records)
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        Ok(self.fetch_zones().await?.into_iter().map(|z| z.name).collect())
    }

    async fn setup_tunnel_ingress(
        &self,
        tunnel_id: &str,
        hostname: &str,
        service_url: &str,
    ) -> Result<()> {
        let account_id = self.account_id()?.to_string();
        let mut ingress = self.tunnel_ingress(&account_id, tunnel_id).await?;

        // Replace any existing rule for this hostname
        ingress.retain(|r| r["hostname"].as_str() != Some(hostname));

        let rule = serde_json::json!({
            "hostname": hostname,
            "service": service_url,
        });

        // The catch-all rule must stay last
        if let Some(pos) = ingress
            .iter()
            .position(|r| r["hostname"].is_null() || r["hostname"].as_str() == Some(""))
        {
            ingress.insert(pos, rule);
        } else {
            ingress.push(rule);
            ingress.push(serde_json::json!({ "service": "http_status:404" }));
        }

        self.put_tunnel_ingress(&account_id, tunnel_id, ingress).await
    }

    async fn remove_tunnel_ingress(&self, tunnel_id: &str, hostname: &str) -> Result<()> {
        let account_id = self.account_id()?.to_string();
        let mut ingress = self.tunnel_ingress(&account_id, tunnel_id).await?;

        let before = ingress.len();
        ingress.retain(|r| r["hostname"].as_str() != Some(hostname));

        if ingress.len() != before {
            self.put_tunnel_ingress(&account_id, tunnel_id, ingress).await?;
        }

        Ok(())
    }
}
