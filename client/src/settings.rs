//! Client settings

use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Routing layer configuration
    #[serde(default)]
    pub routing: RoutingSettings,

    /// Orchestration tuning
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            backend: BackendSettings::default(),
            routing: RoutingSettings::default(),
            orchestrator: OrchestratorSettings::default(),
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Routing layer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Admin API URL of the reverse proxy
    #[serde(default = "default_proxy_admin_url")]
    pub proxy_admin_url: String,

    /// Public IP that proxied hostnames are expected to resolve to
    #[serde(default)]
    pub public_ip: Option<String>,
}

fn default_proxy_admin_url() -> String {
    "http://localhost:2019".to_string()
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            proxy_admin_url: default_proxy_admin_url(),
            public_ip: None,
        }
    }
}

/// Orchestration tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Floor for the automation health-check interval in seconds
    #[serde(default = "default_min_health_interval")]
    pub min_health_check_interval_secs: u32,

    /// Delay between container re-polls after a scale trigger
    #[serde(default = "default_scale_poll_interval")]
    pub scale_poll_interval_secs: u64,

    /// Upper bound on waiting for a scale trigger to converge
    #[serde(default = "default_scale_poll_timeout")]
    pub scale_poll_timeout_secs: u64,
}

fn default_min_health_interval() -> u32 {
    10
}

fn default_scale_poll_interval() -> u64 {
    2
}

fn default_scale_poll_timeout() -> u64 {
    30
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            min_health_check_interval_secs: default_min_health_interval(),
            scale_poll_interval_secs: default_scale_poll_interval(),
            scale_poll_timeout_secs: default_scale_poll_timeout(),
        }
    }
}
