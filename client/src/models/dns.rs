//! DNS provider configuration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::DnsProviderKind;

/// Team-scoped DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsProviderConfig {
    /// Unique configuration ID
    pub id: String,

    /// Owning team ID
    pub team_id: String,

    /// Provider this configuration is for
    pub provider: DnsProviderKind,

    /// Opaque provider-specific credential payload
    pub config: serde_json::Value,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Parsed Cloudflare credential payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// API token with zone and DNS edit scopes
    pub api_token: String,

    /// Account ID; required for tunnel ingress management
    pub account_id: Option<String>,
}

/// A DNS record as reported by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDnsRecord {
    /// Provider-side record ID
    pub id: String,

    /// Record name (fully qualified)
    pub name: String,

    /// Record type, e.g. "A" or "CNAME"
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content (IP or target hostname)
    pub content: String,

    /// Zone the record belongs to
    pub zone_id: String,

    /// Zone name
    pub zone_name: String,

    /// Provider-level proxy flag, when the provider reports one
    #[serde(default)]
    pub proxied: Option<bool>,
}
