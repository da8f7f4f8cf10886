//! In-memory fakes of the collaborator ports, shared by the test suite

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use berth_client::deploy::DeploymentOrchestrator;
use berth_client::domains::{DomainReconciler, ReconcilerSettings};
use berth_client::errors::{PlatformError, Result};
use berth_client::models::container::{ContainerState, ContainerSummary};
use berth_client::models::deployment::{
    AttemptStatus, DeploymentAttempt, NewAttempt, TriggerType,
};
use berth_client::models::dns::{DnsProviderConfig, RemoteDnsRecord};
use berth_client::models::domain::{DnsProviderKind, DomainRecord, RegisterDomain, RouteKind};
use berth_client::models::resource::ResourceLimit;
use berth_client::models::stack::{AutomationPolicy, Stack, StackStatus};
use berth_client::ports::dns::{DnsProviderPort, ProviderFactory};
use berth_client::ports::git::GitPort;
use berth_client::ports::resolve::ResolverPort;
use berth_client::ports::routing::{ProxyRoute, RoutingPort};
use berth_client::ports::runtime::{ComposeApplied, RuntimePort};
use berth_client::ports::store::{
    AttemptStore, DnsConfigStore, DomainStore, ResourceStore, StackStore,
};
use berth_client::settings::OrchestratorSettings;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------- builders

pub fn make_stack(id: &str, status: StackStatus) -> Stack {
    Stack {
        id: id.to_string(),
        name: id.to_string(),
        team_id: "team-1".to_string(),
        compose_content: Some("services:\n  web:\n    image: nginx:latest\n".to_string()),
        status,
        webhook_token: Some("token-original".to_string()),
        automation: AutomationPolicy::default(),
        git: None,
        last_stable_images: None,
        environment: BTreeMap::new(),
        container_count: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn make_container(id: &str, service: &str, state: ContainerState) -> ContainerSummary {
    let mut labels = HashMap::new();
    labels.insert("berth.service.name".to_string(), service.to_string());
    ContainerSummary {
        id: id.to_string(),
        names: vec![format!("/{}", id)],
        image: "nginx:latest".to_string(),
        state,
        status: String::new(),
        labels,
    }
}

pub fn make_domain(
    stack_id: &str,
    hostname: &str,
    provider: DnsProviderKind,
    kind: RouteKind,
) -> DomainRecord {
    DomainRecord {
        id: format!("dom-{}", hostname),
        stack_id: stack_id.to_string(),
        team_id: "team-1".to_string(),
        hostname: hostname.to_string(),
        container_name: "web".to_string(),
        container_port: 80,
        provider,
        kind,
        tunnel_id: match kind {
            RouteKind::Tunnel => Some("tunnel-1".to_string()),
            RouteKind::ReverseProxy => None,
        },
        proxied: false,
        verified: false,
        ssl_enabled: true,
        dns_record_id: Some(format!("rec-{}", hostname)),
        show_branding: true,
        created_at: Utc::now(),
    }
}

pub fn register_request(subdomain: &str, base_domain: &str) -> RegisterDomain {
    RegisterDomain {
        subdomain: subdomain.to_string(),
        base_domain: base_domain.to_string(),
        container_name: "web".to_string(),
        container_port: 80,
        provider: DnsProviderKind::Cloudflare,
        kind: RouteKind::ReverseProxy,
        tunnel_id: None,
        tunnel_token: None,
        proxied: false,
    }
}

// ------------------------------------------------------------------ stacks

#[derive(Default)]
pub struct FakeStackStore {
    pub stacks: Mutex<HashMap<String, Stack>>,
}

impl FakeStackStore {
    pub fn with(stacks: Vec<Stack>) -> Arc<Self> {
        let store = Self::default();
        {
            let mut map = lock(&store.stacks);
            for stack in stacks {
                map.insert(stack.id.clone(), stack);
            }
        }
        Arc::new(store)
    }

    pub fn snapshot(&self, id: &str) -> Option<Stack> {
        lock(&self.stacks).get(id).cloned()
    }

    fn update<F: FnOnce(&mut Stack)>(&self, id: &str, f: F) -> Result<()> {
        let mut map = lock(&self.stacks);
        let stack = map
            .get_mut(id)
            .ok_or_else(|| PlatformError::NotFound("Stack not found".to_string()))?;
        f(stack);
        Ok(())
    }
}

#[async_trait]
impl StackStore for FakeStackStore {
    async fn get(&self, stack_id: &str) -> Result<Stack> {
        self.snapshot(stack_id)
            .ok_or_else(|| PlatformError::NotFound("Stack not found".to_string()))
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<Stack>> {
        Ok(lock(&self.stacks)
            .values()
            .filter(|s| s.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn update_compose(&self, stack_id: &str, compose: &str) -> Result<()> {
        self.update(stack_id, |s| s.compose_content = Some(compose.to_string()))
    }

    async fn update_status(&self, stack_id: &str, status: StackStatus) -> Result<()> {
        self.update(stack_id, |s| s.status = status)
    }

    async fn update_automation(&self, stack_id: &str, policy: &AutomationPolicy) -> Result<()> {
        let policy = policy.clone();
        self.update(stack_id, |s| s.automation = policy)
    }

    async fn update_git_state(&self, stack_id: &str, commit: &str) -> Result<()> {
        let commit = commit.to_string();
        self.update(stack_id, |s| {
            if let Some(git) = s.git.as_mut() {
                git.last_commit = Some(commit);
            }
        })
    }

    async fn update_stable_images(
        &self,
        stack_id: &str,
        images: &BTreeMap<String, String>,
    ) -> Result<()> {
        let images = images.clone();
        self.update(stack_id, |s| s.last_stable_images = Some(images))
    }

    async fn rotate_webhook_token(&self, stack_id: &str) -> Result<String> {
        let token = format!("token-{}", uuid::Uuid::new_v4());
        let issued = token.clone();
        self.update(stack_id, move |s| s.webhook_token = Some(issued))?;
        Ok(token)
    }

    async fn delete(&self, stack_id: &str) -> Result<()> {
        lock(&self.stacks)
            .remove(stack_id)
            .map(|_| ())
            .ok_or_else(|| PlatformError::NotFound("Stack not found".to_string()))
    }
}

// ---------------------------------------------------------------- attempts

#[derive(Default)]
pub struct FakeAttemptStore {
    pub attempts: Mutex<Vec<DeploymentAttempt>>,
}

impl FakeAttemptStore {
    pub fn with_open(stack_id: &str) -> Arc<Self> {
        let store = Self::default();
        lock(&store.attempts).push(DeploymentAttempt {
            id: "att-open".to_string(),
            stack_id: stack_id.to_string(),
            trigger: TriggerType::Manual,
            status: AttemptStatus::Running,
            logs: None,
            started_at: Utc::now(),
            finished_at: None,
        });
        Arc::new(store)
    }

    pub fn all(&self) -> Vec<DeploymentAttempt> {
        lock(&self.attempts).clone()
    }
}

#[async_trait]
impl AttemptStore for FakeAttemptStore {
    async fn append(&self, new: NewAttempt) -> Result<DeploymentAttempt> {
        let mut attempts = lock(&self.attempts);
        let attempt = DeploymentAttempt {
            id: format!("att-{}", attempts.len() + 1),
            stack_id: new.stack_id,
            trigger: new.trigger,
            status: AttemptStatus::Pending,
            logs: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn finish(
        &self,
        attempt_id: &str,
        status: AttemptStatus,
        logs: Option<&str>,
    ) -> Result<DeploymentAttempt> {
        let mut attempts = lock(&self.attempts);
        let attempt = attempts
            .iter_mut()
            .find(|a| a.id == attempt_id)
            .ok_or_else(|| PlatformError::NotFound("Attempt not found".to_string()))?;
        if attempt.finished_at.is_some() {
            return Err(PlatformError::Conflict(
                "Attempt already finished".to_string(),
            ));
        }
        attempt.status = status;
        attempt.logs = logs.map(str::to_string);
        attempt.finished_at = Some(Utc::now());
        Ok(attempt.clone())
    }

    async fn list_by_stack(&self, stack_id: &str, limit: u32) -> Result<Vec<DeploymentAttempt>> {
        let mut attempts: Vec<_> = lock(&self.attempts)
            .iter()
            .filter(|a| a.stack_id == stack_id)
            .cloned()
            .collect();
        attempts.reverse();
        attempts.truncate(limit as usize);
        Ok(attempts)
    }

    async fn find_open(&self, stack_id: &str) -> Result<Option<DeploymentAttempt>> {
        Ok(lock(&self.attempts)
            .iter()
            .filter(|a| a.stack_id == stack_id && a.is_open())
            .last()
            .cloned())
    }
}

// ----------------------------------------------------------------- runtime

#[derive(Default)]
pub struct FakeRuntime {
    pub apply_error: Mutex<Option<String>>,
    pub remove_error: Mutex<Option<String>>,
    pub apply_result: Mutex<BTreeMap<String, String>>,
    pub applied: Mutex<Vec<Option<String>>>,
    pub applied_images: Mutex<Vec<BTreeMap<String, String>>>,
    pub builds: Mutex<Vec<Option<String>>>,
    pub scaled: Mutex<Vec<(String, u32)>>,
    pub containers: Mutex<Vec<ContainerSummary>>,
    pub started: Mutex<u32>,
    pub stopped: Mutex<u32>,
}

impl FakeRuntime {
    pub fn applying(services: &[(&str, &str)]) -> Arc<Self> {
        let runtime = Self::default();
        {
            let mut result = lock(&runtime.apply_result);
            for (service, image) in services {
                result.insert(service.to_string(), image.to_string());
            }
        }
        Arc::new(runtime)
    }

    pub fn failing_apply(message: &str) -> Arc<Self> {
        let runtime = Self::default();
        *lock(&runtime.apply_error) = Some(message.to_string());
        Arc::new(runtime)
    }

    pub fn set_containers(&self, containers: Vec<ContainerSummary>) {
        *lock(&self.containers) = containers;
    }
}

#[async_trait]
impl RuntimePort for FakeRuntime {
    async fn apply_compose(
        &self,
        _stack: &Stack,
        _compose: &str,
        _env: &BTreeMap<String, String>,
        service: Option<&str>,
    ) -> Result<ComposeApplied> {
        if let Some(message) = lock(&self.apply_error).clone() {
            return Err(PlatformError::RemoteUnavailable(message));
        }
        lock(&self.applied).push(service.map(str::to_string));
        Ok(ComposeApplied {
            services: lock(&self.apply_result).clone(),
        })
    }

    async fn apply_images(&self, _stack: &Stack, images: &BTreeMap<String, String>) -> Result<()> {
        lock(&self.applied_images).push(images.clone());
        Ok(())
    }

    async fn build(&self, _stack: &Stack, service: Option<&str>) -> Result<()> {
        lock(&self.builds).push(service.map(str::to_string));
        Ok(())
    }

    async fn scale(&self, _stack: &Stack, service: &str, replicas: u32) -> Result<()> {
        lock(&self.scaled).push((service.to_string(), replicas));
        Ok(())
    }

    async fn list_containers(&self, _stack: &Stack) -> Result<Vec<ContainerSummary>> {
        Ok(lock(&self.containers).clone())
    }

    async fn start_containers(&self, _stack: &Stack) -> Result<()> {
        *lock(&self.started) += 1;
        Ok(())
    }

    async fn stop_containers(&self, _stack: &Stack) -> Result<()> {
        *lock(&self.stopped) += 1;
        Ok(())
    }

    async fn remove_stack(&self, _stack: &Stack) -> Result<()> {
        if let Some(message) = lock(&self.remove_error).clone() {
            return Err(PlatformError::RemoteUnavailable(message));
        }
        Ok(())
    }
}

// --------------------------------------------------------------------- git

pub struct FakeGit {
    pub head: Mutex<String>,
    pub compose: Mutex<String>,
}

impl FakeGit {
    pub fn at(head: &str, compose: &str) -> Arc<Self> {
        Arc::new(Self {
            head: Mutex::new(head.to_string()),
            compose: Mutex::new(compose.to_string()),
        })
    }
}

#[async_trait]
impl GitPort for FakeGit {
    async fn resolve_head(&self, _url: &str, _branch: &str) -> Result<String> {
        Ok(lock(&self.head).clone())
    }

    async fn fetch_compose(&self, _source: &berth_client::models::stack::GitSource) -> Result<String> {
        Ok(lock(&self.compose).clone())
    }
}

// ----------------------------------------------------------------- domains

#[derive(Default)]
pub struct FakeDomainStore {
    pub records: Mutex<Vec<DomainRecord>>,
}

impl FakeDomainStore {
    pub fn with(records: Vec<DomainRecord>) -> Arc<Self> {
        let store = Self::default();
        *lock(&store.records) = records;
        Arc::new(store)
    }

    fn update<F: FnOnce(&mut DomainRecord)>(&self, hostname: &str, f: F) -> Result<()> {
        let mut records = lock(&self.records);
        let record = records
            .iter_mut()
            .find(|r| r.hostname == hostname)
            .ok_or_else(|| PlatformError::NotFound("Domain not found".to_string()))?;
        f(record);
        Ok(())
    }
}

#[async_trait]
impl DomainStore for FakeDomainStore {
    async fn create(&self, record: &DomainRecord) -> Result<DomainRecord> {
        let mut records = lock(&self.records);
        if records.iter().any(|r| r.hostname == record.hostname) {
            return Err(PlatformError::Conflict(format!(
                "Domain '{}' already exists",
                record.hostname
            )));
        }
        records.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DomainRecord>> {
        Ok(lock(&self.records)
            .iter()
            .find(|r| r.hostname == hostname)
            .cloned())
    }

    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<DomainRecord>> {
        Ok(lock(&self.records)
            .iter()
            .filter(|r| r.stack_id == stack_id)
            .cloned()
            .collect())
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DomainRecord>> {
        Ok(lock(&self.records)
            .iter()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<DomainRecord>> {
        Ok(lock(&self.records).clone())
    }

    async fn set_verified(&self, hostname: &str, verified: bool) -> Result<()> {
        self.update(hostname, |r| r.verified = verified)
    }

    async fn set_branding(&self, hostname: &str, show: bool) -> Result<()> {
        self.update(hostname, |r| r.show_branding = show)
    }

    async fn set_dns_record_id(&self, hostname: &str, record_id: Option<&str>) -> Result<()> {
        let record_id = record_id.map(str::to_string);
        self.update(hostname, |r| r.dns_record_id = record_id)
    }

    async fn delete(&self, hostname: &str) -> Result<()> {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|r| r.hostname != hostname);
        if records.len() == before {
            return Err(PlatformError::NotFound("Domain not found".to_string()));
        }
        Ok(())
    }
}

// --------------------------------------------------------------- resources

#[derive(Default)]
pub struct FakeResourceStore {
    pub limits: Mutex<Vec<ResourceLimit>>,
}

#[async_trait]
impl ResourceStore for FakeResourceStore {
    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<ResourceLimit>> {
        Ok(lock(&self.limits)
            .iter()
            .filter(|l| l.stack_id == stack_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, limit: &ResourceLimit) -> Result<ResourceLimit> {
        let mut limits = lock(&self.limits);
        limits.retain(|l| {
            !(l.stack_id == limit.stack_id && l.service_name == limit.service_name)
        });
        limits.push(limit.clone());
        Ok(limit.clone())
    }

    async fn remove(&self, stack_id: &str, service_name: &str) -> Result<()> {
        lock(&self.limits)
            .retain(|l| !(l.stack_id == stack_id && l.service_name == service_name));
        Ok(())
    }
}

// ------------------------------------------------------------- dns configs

#[derive(Default)]
pub struct FakeDnsConfigStore {
    pub configs: Mutex<Vec<DnsProviderConfig>>,
}

#[async_trait]
impl DnsConfigStore for FakeDnsConfigStore {
    async fn find(
        &self,
        team_id: &str,
        provider: DnsProviderKind,
    ) -> Result<Option<DnsProviderConfig>> {
        Ok(lock(&self.configs)
            .iter()
            .find(|c| c.team_id == team_id && c.provider == provider)
            .cloned())
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<DnsProviderConfig>> {
        Ok(lock(&self.configs)
            .iter()
            .filter(|c| c.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn save(&self, config: &DnsProviderConfig) -> Result<DnsProviderConfig> {
        let mut configs = lock(&self.configs);
        configs.retain(|c| !(c.team_id == config.team_id && c.provider == config.provider));
        configs.push(config.clone());
        Ok(config.clone())
    }

    async fn delete(&self, team_id: &str, provider: DnsProviderKind) -> Result<()> {
        lock(&self.configs).retain(|c| !(c.team_id == team_id && c.provider == provider));
        Ok(())
    }
}

// ------------------------------------------------------------ dns provider

#[derive(Default)]
pub struct DnsState {
    pub records: Vec<RemoteDnsRecord>,
    pub zones: Vec<String>,
    pub ingress: Vec<(String, String, String)>,
    pub next_id: u32,
    pub created: u32,
    pub updated: u32,
    pub deleted: u32,
    pub fail_delete: bool,
}

pub struct FakeDnsProvider {
    pub state: Arc<Mutex<DnsState>>,
}

#[async_trait]
impl DnsProviderPort for FakeDnsProvider {
    async fn create_record(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<String> {
        let mut state = lock(&self.state);
        state.next_id += 1;
        state.created += 1;
        let id = format!("rec-{}", state.next_id);
        let zone_name = state
            .zones
            .iter()
            .find(|z| name == *z || name.ends_with(&format!(".{}", z)))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        state.records.push(RemoteDnsRecord {
            id: id.clone(),
            name: name.to_string(),
            record_type: record_type.to_string(),
            content: content.to_string(),
            zone_id: "zone-1".to_string(),
            zone_name,
            proxied: Some(proxied),
        });
        Ok(id)
    }

    async fn update_record(
        &self,
        _name: &str,
        record_id: &str,
        record_type: &str,
        content: &str,
        proxied: bool,
    ) -> Result<()> {
        let mut state = lock(&self.state);
        state.updated += 1;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| PlatformError::NotFound("Record not found".to_string()))?;
        record.record_type = record_type.to_string();
        record.content = content.to_string();
        record.proxied = Some(proxied);
        Ok(())
    }

    async fn delete_record(&self, _name: &str, record_id: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_delete {
            return Err(PlatformError::RemoteUnavailable(
                "DNS API unreachable".to_string(),
            ));
        }
        state.deleted += 1;
        state.records.retain(|r| r.id != record_id);
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<RemoteDnsRecord>> {
        Ok(lock(&self.state).records.clone())
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        Ok(lock(&self.state).zones.clone())
    }

    async fn setup_tunnel_ingress(
        &self,
        tunnel_id: &str,
        hostname: &str,
        service_url: &str,
    ) -> Result<()> {
        let mut state = lock(&self.state);
        state
            .ingress
            .retain(|(t, h, _)| !(t == tunnel_id && h == hostname));
        state.ingress.push((
            tunnel_id.to_string(),
            hostname.to_string(),
            service_url.to_string(),
        ));
        Ok(())
    }

    async fn remove_tunnel_ingress(&self, tunnel_id: &str, hostname: &str) -> Result<()> {
        lock(&self.state)
            .ingress
            .retain(|(t, h, _)| !(t == tunnel_id && h == hostname));
        Ok(())
    }
}

pub struct FakeProviderFactory {
    pub state: Arc<Mutex<DnsState>>,
}

#[async_trait]
impl ProviderFactory for FakeProviderFactory {
    async fn provider(
        &self,
        _team_id: &str,
        kind: DnsProviderKind,
    ) -> Result<Box<dyn DnsProviderPort>> {
        if matches!(kind, DnsProviderKind::Custom) {
            return Err(PlatformError::Validation(
                "Custom provider does not support automated DNS".to_string(),
            ));
        }
        Ok(Box::new(FakeDnsProvider {
            state: self.state.clone(),
        }))
    }
}

// ----------------------------------------------------------------- routing

#[derive(Default)]
pub struct FakeRouting {
    pub routes: Mutex<Vec<ProxyRoute>>,
    pub register_calls: Mutex<u32>,
    pub deregister_calls: Mutex<u32>,
}

impl FakeRouting {
    pub fn route_for(&self, hostname: &str) -> Option<ProxyRoute> {
        lock(&self.routes)
            .iter()
            .find(|r| r.hostname == hostname)
            .cloned()
    }
}

#[async_trait]
impl RoutingPort for FakeRouting {
    async fn register_route(&self, route: &ProxyRoute) -> Result<()> {
        *lock(&self.register_calls) += 1;
        let mut routes = lock(&self.routes);
        routes.retain(|r| r.hostname != route.hostname);
        routes.push(route.clone());
        Ok(())
    }

    async fn deregister_route(&self, hostname: &str) -> Result<()> {
        *lock(&self.deregister_calls) += 1;
        lock(&self.routes).retain(|r| r.hostname != hostname);
        Ok(())
    }

    async fn routes(&self) -> Result<Vec<ProxyRoute>> {
        Ok(lock(&self.routes).clone())
    }
}

// ---------------------------------------------------------------- resolver

#[derive(Default)]
pub struct FakeResolver {
    pub a: Mutex<HashMap<String, Vec<String>>>,
    pub cname: Mutex<HashMap<String, Vec<String>>>,
}

impl FakeResolver {
    pub fn resolving_a(hostname: &str, addresses: &[&str]) -> Arc<Self> {
        let resolver = Self::default();
        lock(&resolver.a).insert(
            hostname.to_string(),
            addresses.iter().map(|s| s.to_string()).collect(),
        );
        Arc::new(resolver)
    }
}

#[async_trait]
impl ResolverPort for FakeResolver {
    async fn lookup_a(&self, hostname: &str) -> Result<Vec<String>> {
        Ok(lock(&self.a).get(hostname).cloned().unwrap_or_default())
    }

    async fn lookup_cname(&self, hostname: &str) -> Result<Vec<String>> {
        Ok(lock(&self.cname).get(hostname).cloned().unwrap_or_default())
    }
}

// --------------------------------------------------------------- harnesses

pub struct Harness {
    pub stacks: Arc<FakeStackStore>,
    pub attempts: Arc<FakeAttemptStore>,
    pub resources: Arc<FakeResourceStore>,
    pub runtime: Arc<FakeRuntime>,
    pub git: Arc<FakeGit>,
    pub orchestrator: DeploymentOrchestrator,
}

impl Harness {
    pub fn new(stack: Stack, runtime: Arc<FakeRuntime>) -> Self {
        Self::build(stack, runtime, Arc::new(FakeAttemptStore::default()))
    }

    pub fn with_open_attempt(stack: Stack, runtime: Arc<FakeRuntime>) -> Self {
        let attempts = FakeAttemptStore::with_open(&stack.id);
        Self::build(stack, runtime, attempts)
    }

    fn build(stack: Stack, runtime: Arc<FakeRuntime>, attempts: Arc<FakeAttemptStore>) -> Self {
        let stacks = FakeStackStore::with(vec![stack]);
        let resources = Arc::new(FakeResourceStore::default());
        let git = FakeGit::at("abc123", "services:\n  web:\n    image: nginx:1.27\n");
        let orchestrator = DeploymentOrchestrator::new(
            stacks.clone(),
            attempts.clone(),
            resources.clone(),
            runtime.clone(),
            git.clone(),
            OrchestratorSettings::default(),
        );
        Self {
            stacks,
            attempts,
            resources,
            runtime,
            git,
            orchestrator,
        }
    }
}

pub struct DomainHarness {
    pub domains: Arc<FakeDomainStore>,
    pub dns: Arc<Mutex<DnsState>>,
    pub routing: Arc<FakeRouting>,
    pub resolver: Arc<FakeResolver>,
    pub reconciler: DomainReconciler,
}

impl DomainHarness {
    pub fn new(
        records: Vec<DomainRecord>,
        resolver: Arc<FakeResolver>,
        public_ip: Option<&str>,
    ) -> Self {
        let domains = FakeDomainStore::with(records);
        let dns = Arc::new(Mutex::new(DnsState {
            zones: vec!["example.com".to_string()],
            ..DnsState::default()
        }));
        let routing = Arc::new(FakeRouting::default());
        let reconciler = DomainReconciler::new(
            domains.clone(),
            Arc::new(FakeProviderFactory { state: dns.clone() }),
            routing.clone(),
            resolver.clone(),
            ReconcilerSettings {
                public_ip: public_ip.map(str::to_string),
            },
        );
        Self {
            domains,
            dns,
            routing,
            resolver,
            reconciler,
        }
    }
}
