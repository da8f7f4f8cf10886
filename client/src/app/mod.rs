//! Platform wiring

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::info;

use crate::deploy::DeploymentOrchestrator;
use crate::dns::ProviderRegistry;
use crate::domains::{DomainReconciler, ReconcilerSettings};
use crate::errors::Result;
use crate::gitsrc::GitCli;
use crate::http::HttpClient;
use crate::resolve::DnsResolver;
use crate::routing::ProxyRouter;
use crate::settings::Settings;

/// Wired entry point for embedding callers (dashboard, CLI, API layer)
pub struct Platform {
    /// Backend API client
    pub http: Arc<HttpClient>,

    /// Stack deployment orchestration
    pub orchestrator: Arc<DeploymentOrchestrator>,

    /// Domain reconciliation
    pub reconciler: Arc<DomainReconciler>,

    /// DNS provider configuration
    pub registry: Arc<ProviderRegistry>,
}

impl Platform {
    /// Initialize all services from settings
    pub fn init(settings: &Settings, api_token: SecretString) -> Result<Self> {
        info!("Initializing platform client...");

        let http = Arc::new(HttpClient::new(
            &settings.backend.base_url,
            api_token,
            Duration::from_secs(settings.backend.request_timeout_secs),
        )?);

        let registry = Arc::new(ProviderRegistry::new(http.clone()));

        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            http.clone(),
            http.clone(),
            http.clone(),
            http.clone(),
            Arc::new(GitCli::new()),
            settings.orchestrator.clone(),
        ));

        let reconciler = Arc::new(DomainReconciler::new(
            http.clone(),
            registry.clone(),
            Arc::new(ProxyRouter::new(settings.routing.proxy_admin_url.clone())),
            Arc::new(DnsResolver::new()),
            ReconcilerSettings {
                public_ip: settings.routing.public_ip.clone(),
            },
        ));

        Ok(Self {
            http,
            orchestrator,
            reconciler,
            registry,
        })
    }
}
