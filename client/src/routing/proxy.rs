//! Reverse-proxy admin API client

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::errors::{PlatformError, Result};
use crate::ports::routing::{ProxyRoute, RoutingPort};

/// Client for the reverse proxy's admin API route table
pub struct ProxyRouter {
    admin_api_url: String,
    client: Client,
}

impl ProxyRouter {
    pub fn new(admin_api_url: String) -> Self {
        Self {
            admin_api_url: admin_api_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Perform a request, falling back from localhost to the proxy's
    /// container-network name when the admin port is not bound locally
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.admin_api_url, path);
        let mut builder = self.client.request(method.clone(), &url);
        if let Some(ref b) = body {
            builder = builder.json(b);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) if e.is_connect() && self.admin_api_url.contains("localhost") => {
                let fallback = format!(
                    "{}{}",
                    self.admin_api_url.replace("localhost", "proxy"),
                    path
                );
                let mut builder = self.client.request(method, &fallback);
                if let Some(ref b) = body {
                    builder = builder.json(b);
                }
                builder.send().await?
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PlatformError::RemoteUnavailable(format!(
                "Proxy admin API error ({}): {}",
                status, text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl RoutingPort for ProxyRouter {
    async fn register_route(&self, route: &ProxyRoute) -> Result<()> {
        debug!("Registering route {} -> {}", route.hostname, route.upstream);
        self.request(
            Method::PUT,
            &format!("/routes/{}", route.hostname),
            Some(serde_json::json!({
                "upstream": route.upstream,
                "show_branding": route.show_branding,
            })),
        )
        .await?;
        Ok(())
    }

    async fn deregister_route(&self, hostname: &str) -> Result<()> {
        debug!("Deregistering route {}", hostname);
        let result = self
            .request(Method::DELETE, &format!("/routes/{}", hostname), None)
            .await;

        // A missing route is already the desired end state
        match result {
            Ok(_) => Ok(()),
            Err(PlatformError::RemoteUnavailable(msg)) if msg.contains("404") => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn routes(&self) -> Result<Vec<ProxyRoute>> {
        let response = self.request(Method::GET, "/routes", None).await?;
        let routes = response.json().await?;
        Ok(routes)
    }
}
