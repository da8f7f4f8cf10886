//! Domain reconciler

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domains::{hostname, tunnel};
use crate::errors::{PlatformError, Result};
use crate::models::dns::RemoteDnsRecord;
use crate::models::domain::{
    DnsProviderKind, DomainRecord, RegisterDomain, RouteKind, VerificationResult,
};
use crate::models::stack::Stack;
use crate::ports::dns::ProviderFactory;
use crate::ports::resolve::ResolverPort;
use crate::ports::routing::{ProxyRoute, RoutingPort};
use crate::ports::store::DomainStore;

/// Reconciler tuning
#[derive(Debug, Clone, Default)]
pub struct ReconcilerSettings {
    /// Public IP that reverse-proxied hostnames must resolve to
    pub public_ip: Option<String>,
}

/// Outcome of a full reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Routes added or corrected
    pub routes_added: u32,

    /// Orphan routes removed
    pub routes_removed: u32,

    /// DNS records re-provisioned
    pub records_provisioned: u32,

    /// Remote operations that failed; local state stays authoritative
    pub failures: Vec<String>,
}

impl SyncReport {
    /// Whether the pass performed any remote mutation
    pub fn changed(&self) -> bool {
        self.routes_added > 0 || self.routes_removed > 0 || self.records_provisioned > 0
    }
}

/// Keeps domain records consistent with DNS provider state and the routing
/// layer. Operations on distinct hostnames are independent; the caller must
/// not issue concurrent operations on one hostname.
pub struct DomainReconciler {
    domains: Arc<dyn DomainStore>,
    registry: Arc<dyn ProviderFactory>,
    routing: Arc<dyn RoutingPort>,
    resolver: Arc<dyn ResolverPort>,
    settings: ReconcilerSettings,
}

impl DomainReconciler {
    pub fn new(
        domains: Arc<dyn DomainStore>,
        registry: Arc<dyn ProviderFactory>,
        routing: Arc<dyn RoutingPort>,
        resolver: Arc<dyn ResolverPort>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            domains,
            registry,
            routing,
            resolver,
            settings,
        }
    }

    /// Fetch a record and check it belongs to the given stack
    async fn owned_record(&self, stack_id: &str, hostname: &str) -> Result<DomainRecord> {
        self.domains
            .find_by_hostname(hostname)
            .await?
            .filter(|record| record.stack_id == stack_id)
            .ok_or_else(|| PlatformError::NotFound(format!("Domain '{}' not found", hostname)))
    }

    /// Register a hostname for a stack: validate, provision DNS, store the
    /// record, and wire up routing. Validation happens before any remote
    /// mutation; later-step failures compensate the earlier steps.
    pub async fn register(&self, stack: &Stack, request: RegisterDomain) -> Result<DomainRecord> {
        if request.container_name.is_empty() {
            return Err(PlatformError::Validation(
                "A target container must be selected".to_string(),
            ));
        }
        if request.container_port == 0 {
            return Err(PlatformError::Validation(
                "A target port must be selected".to_string(),
            ));
        }

        let host = hostname::join(&request.subdomain, &request.base_domain);
        hostname::validate(&host)?;

        let tunnel_id = match request.kind {
            RouteKind::Tunnel => {
                if matches!(request.provider, DnsProviderKind::Custom) {
                    return Err(PlatformError::Validation(
                        "Tunnel routing requires an automated DNS provider".to_string(),
                    ));
                }
                let id = request.tunnel_id.clone().or_else(|| {
                    request
                        .tunnel_token
                        .as_deref()
                        .and_then(tunnel::extract_tunnel_id)
                });
                Some(id.ok_or_else(|| {
                    PlatformError::Validation(
                        "A tunnel ID or tunnel token is required for tunnel routing".to_string(),
                    )
                })?)
            }
            RouteKind::ReverseProxy => {
                if request.tunnel_id.is_some() {
                    return Err(PlatformError::Validation(
                        "A reverse-proxy domain must not carry a tunnel ID".to_string(),
                    ));
                }
                None
            }
        };

        // One hostname maps to exactly one record across all stacks; the
        // routing layer cannot arbitrate two claimants
        if self.domains.find_by_hostname(&host).await?.is_some() {
            return Err(PlatformError::Conflict(format!(
                "Hostname '{}' is already bound to a stack",
                host
            )));
        }

        let provider = match request.provider {
            DnsProviderKind::Custom => None,
            kind => Some(self.registry.provider(&stack.team_id, kind).await?),
        };

        let dns_record_id = match &provider {
            Some(adapter) => {
                let (record_type, content) = match request.kind {
                    RouteKind::ReverseProxy => {
                        let ip = self.settings.public_ip.clone().ok_or_else(|| {
                            PlatformError::Validation(
                                "A public IP must be configured for reverse-proxy DNS provisioning"
                                    .to_string(),
                            )
                        })?;
                        ("A", ip)
                    }
                    RouteKind::Tunnel => {
                        let id = tunnel_id.as_deref().unwrap_or_default();
                        ("CNAME", format!("{}.cfargotunnel.com", id))
                    }
                };
                Some(
                    adapter
                        .create_record(&host, record_type, &content, request.proxied)
                        .await?,
                )
            }
            None => None,
        };

        let record = DomainRecord {
            id: Uuid::new_v4().to_string(),
            stack_id: stack.id.clone(),
            team_id: stack.team_id.clone(),
            hostname: host.clone(),
            container_name: request.container_name,
            container_port: request.container_port,
            provider: request.provider,
            kind: request.kind,
            tunnel_id: tunnel_id.clone(),
            proxied: request.proxied,
            verified: false,
            ssl_enabled: true,
            dns_record_id: dns_record_id.clone(),
            show_branding: true,
            created_at: Utc::now(),
        };

        let created = match self.domains.create(&record).await {
            Ok(created) => created,
            Err(e) => {
                if let (Some(adapter), Some(record_id)) = (&provider, &dns_record_id) {
                    let _ = adapter.delete_record(&host, record_id).await;
                }
                return Err(e);
            }
        };

        let routed = match created.kind {
            RouteKind::ReverseProxy => {
                self.routing
                    .register_route(&ProxyRoute {
                        hostname: host.clone(),
                        upstream: created.upstream(),
                        show_branding: created.show_branding,
                    })
                    .await
            }
            RouteKind::Tunnel => match (&provider, tunnel_id.as_deref()) {
                (Some(adapter), Some(id)) => {
                    adapter
                        .setup_tunnel_ingress(id, &host, &format!("http://{}", created.upstream()))
                        .await
                }
                // Unreachable after validation; nothing to wire up
                _ => Ok(()),
            },
        };

        if let Err(e) = routed {
            if let (Some(adapter), Some(record_id)) = (&provider, &dns_record_id) {
                let _ = adapter.delete_record(&host, record_id).await;
            }
            let _ = self.domains.delete(&host).await;
            return Err(e);
        }

        info!("Registered domain {} for stack {}", host, stack.id);
        Ok(created)
    }

    /// Resolve a hostname and compare against the expected target for its
    /// routing mode. Read-only against DNS; only the verified flag is
    /// persisted. Idempotent.
    pub async fn verify(&self, stack_id: &str, host: &str) -> Result<VerificationResult> {
        let record = self.owned_record(stack_id, host).await?;

        let (a_records, cname_records) = futures::join!(
            self.resolver.lookup_a(host),
            self.resolver.lookup_cname(host)
        );
        let (a_records, cname_records) = (a_records?, cname_records?);

        let verified = match record.kind {
            RouteKind::ReverseProxy => match self.settings.public_ip.as_deref() {
                Some(expected) => a_records.iter().any(|ip| ip == expected),
                // Without a configured public IP, any resolution counts
                None => !a_records.is_empty() || !cname_records.is_empty(),
            },
            RouteKind::Tunnel => {
                let expected = record.expected_target(None).unwrap_or_default();
                cname_records.iter().any(|c| c == &expected)
            }
        };

        self.domains.set_verified(host, verified).await?;

        Ok(VerificationResult {
            hostname: host.to_string(),
            verified,
            a_records,
            cname_records,
        })
    }

    /// Advanced-mode override of the underlying DNS record. Verification is
    /// a separate step; the record stays auto-managed.
    pub async fn update_dns_record(
        &self,
        stack: &Stack,
        host: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<()> {
        let record = self.owned_record(&stack.id, host).await?;

        if matches!(record.provider, DnsProviderKind::Custom) {
            return Err(PlatformError::Validation(
                "Custom provider records are managed outside the platform".to_string(),
            ));
        }
        let record_id = record.dns_record_id.as_deref().ok_or_else(|| {
            PlatformError::Validation(format!("Domain '{}' has no provisioned DNS record", host))
        })?;

        let adapter = self.registry.provider(&stack.team_id, record.provider).await?;
        adapter
            .update_record(host, record_id, record_type, content, proxied)
            .await?;

        info!("Updated DNS record for {} ({} {})", host, record_type, content);
        Ok(())
    }

    /// Remove a domain. Remote DNS and routing teardown are best-effort:
    /// the local record is deleted regardless, and any remote failure is
    /// surfaced as a partial outcome for the next reconciliation pass.
    pub async fn remove(&self, stack_id: &str, host: &str) -> Result<()> {
        let record = self.owned_record(stack_id, host).await?;
        let mut remote_failures: Vec<String> = Vec::new();

        let adapter = match record.provider {
            DnsProviderKind::Custom => None,
            kind => match self.registry.provider(&record.team_id, kind).await {
                Ok(adapter) => Some(adapter),
                Err(e) => {
                    remote_failures.push(e.to_string());
                    None
                }
            },
        };

        if let (Some(adapter), Some(record_id)) = (&adapter, record.dns_record_id.as_deref()) {
            if let Err(e) = adapter.delete_record(host, record_id).await {
                warn!("Failed to delete remote DNS record for {}: {}", host, e);
                remote_failures.push(e.to_string());
            }
        }

        match record.kind {
            RouteKind::ReverseProxy => {
                if let Err(e) = self.routing.deregister_route(host).await {
                    warn!("Failed to deregister route for {}: {}", host, e);
                    remote_failures.push(e.to_string());
                }
            }
            RouteKind::Tunnel => {
                if let (Some(adapter), Some(tunnel_id)) = (&adapter, record.tunnel_id.as_deref()) {
                    if let Err(e) = adapter.remove_tunnel_ingress(tunnel_id, host).await {
                        warn!("Failed to remove tunnel ingress for {}: {}", host, e);
                        remote_failures.push(e.to_string());
                    }
                }
            }
        }

        self.domains.delete(host).await?;
        info!("Removed domain {}", host);

        if !remote_failures.is_empty() {
            return Err(PlatformError::Partial(format!(
                "Domain '{}' removed locally; remote cleanup failed: {}",
                host,
                remote_failures.join("; ")
            )));
        }

        Ok(())
    }

    /// Flip the branding visibility flag. Local only, no DNS interaction.
    pub async fn toggle_branding(
        &self,
        stack_id: &str,
        host: &str,
        show: bool,
    ) -> Result<DomainRecord> {
        let _ = self.owned_record(stack_id, host).await?;
        self.domains.set_branding(host, show).await?;
        self.owned_record(stack_id, host).await
    }

    /// Reconcile the routing layer and DNS provisioning against the full
    /// set of domain records. Idempotent: a second pass with no intervening
    /// changes performs no remote mutations.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let records = self.domains.list_all().await?;
        let current = self.routing.routes().await?;
        let mut report = SyncReport::default();

        let desired: BTreeMap<String, ProxyRoute> = records
            .iter()
            .filter(|r| matches!(r.kind, RouteKind::ReverseProxy))
            .map(|r| {
                (
                    r.hostname.clone(),
                    ProxyRoute {
                        hostname: r.hostname.clone(),
                        upstream: r.upstream(),
                        show_branding: r.show_branding,
                    },
                )
            })
            .collect();

        // Distinct hostnames are independent; missing routes go out in one
        // concurrent batch
        let missing: Vec<&ProxyRoute> = desired
            .values()
            .filter(|route| !current.iter().any(|r| r == *route))
            .collect();
        let outcomes =
            futures::future::join_all(missing.iter().map(|route| self.routing.register_route(route)))
                .await;
        for (route, outcome) in missing.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.routes_added += 1,
                Err(e) => {
                    error!("Failed to sync route for {}: {}", route.hostname, e);
                    report.failures.push(format!("{}: {}", route.hostname, e));
                }
            }
        }

        for route in &current {
            if desired.contains_key(&route.hostname) {
                continue;
            }
            match self.routing.deregister_route(&route.hostname).await {
                Ok(()) => report.routes_removed += 1,
                Err(e) => {
                    error!("Failed to drop orphan route {}: {}", route.hostname, e);
                    report.failures.push(format!("{}: {}", route.hostname, e));
                }
            }
        }

        // Auto-managed records that lost their provider-side ID get
        // re-provisioned so verification can succeed again
        for record in records
            .iter()
            .filter(|r| !matches!(r.provider, DnsProviderKind::Custom) && r.dns_record_id.is_none())
        {
            let outcome = self.provision_record(record).await;
            match outcome {
                Ok(()) => report.records_provisioned += 1,
                Err(e) => {
                    error!("Failed to re-provision DNS for {}: {}", record.hostname, e);
                    report.failures.push(format!("{}: {}", record.hostname, e));
                }
            }
        }

        if report.changed() {
            info!(
                "Reconciliation pass: {} routes added, {} removed, {} records provisioned",
                report.routes_added, report.routes_removed, report.records_provisioned
            );
        }
        Ok(report)
    }

    async fn provision_record(&self, record: &DomainRecord) -> Result<()> {
        let adapter = self.registry.provider(&record.team_id, record.provider).await?;
        let target = record
            .expected_target(self.settings.public_ip.as_deref())
            .ok_or_else(|| {
                PlatformError::Validation(format!(
                    "No DNS target derivable for {}",
                    record.hostname
                ))
            })?;
        let record_type = match record.kind {
            RouteKind::ReverseProxy => "A",
            RouteKind::Tunnel => "CNAME",
        };

        let record_id = adapter
            .create_record(&record.hostname, record_type, &target, record.proxied)
            .await?;
        self.domains
            .set_dns_record_id(&record.hostname, Some(&record_id))
            .await
    }

    /// Provider records not yet tracked locally, offered for import
    pub async fn list_remote_records(
        &self,
        team_id: &str,
        kind: DnsProviderKind,
    ) -> Result<Vec<RemoteDnsRecord>> {
        let adapter = self.registry.provider(team_id, kind).await?;
        let remote = adapter.list_records().await?;

        let tracked: HashSet<String> = self
            .domains
            .list_all()
            .await?
            .into_iter()
            .map(|d| d.hostname)
            .collect();

        Ok(remote
            .into_iter()
            .filter(|r| !tracked.contains(&r.name))
            .collect())
    }

    /// Zone names usable as base domains for registration
    pub async fn list_available_domains(
        &self,
        team_id: &str,
        kind: DnsProviderKind,
    ) -> Result<Vec<String>> {
        let adapter = self.registry.provider(team_id, kind).await?;
        adapter.list_zones().await
    }

    /// Domain records bound to one stack
    pub async fn list(&self, stack_id: &str) -> Result<Vec<DomainRecord>> {
        self.domains.list_by_stack(stack_id).await
    }

    /// Domain records across a team
    pub async fn list_team(&self, team_id: &str) -> Result<Vec<DomainRecord>> {
        self.domains.list_by_team(team_id).await
    }
}
