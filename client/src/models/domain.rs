//! Domain record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hostname-to-container binding with its provisioning state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Unique record ID
    pub id: String,

    /// Owning stack ID
    pub stack_id: String,

    /// Team owning the stack; DNS provider configuration is looked up here
    pub team_id: String,

    /// Fully qualified hostname
    pub hostname: String,

    /// Target container name
    pub container_name: String,

    /// Target container port
    pub container_port: u16,

    /// DNS provider managing the record
    pub provider: DnsProviderKind,

    /// Routing mode
    pub kind: RouteKind,

    /// Tunnel identifier; required for tunnel routing
    pub tunnel_id: Option<String>,

    /// Provider-level proxy toggle
    #[serde(default)]
    pub proxied: bool,

    /// Whether the last verification check resolved to the expected target
    #[serde(default)]
    pub verified: bool,

    /// Whether TLS is served for the hostname
    #[serde(default = "default_true")]
    pub ssl_enabled: bool,

    /// Remote DNS record ID, set once provisioned
    pub dns_record_id: Option<String>,

    /// Whether platform branding is injected on served pages
    #[serde(default = "default_true")]
    pub show_branding: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl DomainRecord {
    /// The upstream address routes point at
    pub fn upstream(&self) -> String {
        format!("{}:{}", self.container_name, self.container_port)
    }

    /// The DNS target expected for this record's routing mode
    pub fn expected_target(&self, public_ip: Option<&str>) -> Option<String> {
        match self.kind {
            RouteKind::ReverseProxy => public_ip.map(str::to_string),
            RouteKind::Tunnel => self
                .tunnel_id
                .as_deref()
                .map(|id| format!("{}.cfargotunnel.com", id)),
        }
    }
}

/// Supported DNS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsProviderKind {
    /// Manually managed DNS; no remote provisioning
    Custom,
    Cloudflare,
    CPanel,
}

impl std::fmt::Display for DnsProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DnsProviderKind::Custom => write!(f, "Custom"),
            DnsProviderKind::Cloudflare => write!(f, "Cloudflare"),
            DnsProviderKind::CPanel => write!(f, "CPanel"),
        }
    }
}

/// Routing mode for a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    ReverseProxy,
    Tunnel,
}

/// Request to register a new domain for a stack
#[derive(Debug, Clone)]
pub struct RegisterDomain {
    /// Subdomain label; empty registers the base domain itself
    pub subdomain: String,

    /// Base domain (zone)
    pub base_domain: String,

    /// Target container name
    pub container_name: String,

    /// Target container port
    pub container_port: u16,

    /// DNS provider to provision through
    pub provider: DnsProviderKind,

    /// Routing mode
    pub kind: RouteKind,

    /// Tunnel identifier, when already known
    pub tunnel_id: Option<String>,

    /// Tunnel connector token; the tunnel ID can be derived from it
    pub tunnel_token: Option<String>,

    /// Provider-level proxy toggle
    pub proxied: bool,
}

/// Outcome of a hostname verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Hostname that was checked
    pub hostname: String,

    /// Whether resolution matched the expected target
    pub verified: bool,

    /// A records observed
    pub a_records: Vec<String>,

    /// CNAME targets observed
    pub cname_records: Vec<String>,
}
