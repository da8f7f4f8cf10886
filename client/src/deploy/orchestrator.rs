//! Deployment orchestrator

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::deploy::fsm::{StackEvent, StackFsm};
use crate::deploy::poll::{self, PollOptions, PollOutcome};
use crate::errors::{PlatformError, Result};
use crate::health::{compute_health, HealthStatus, StackHealth};
use crate::models::deployment::{AttemptStatus, DeploymentAttempt, NewAttempt, TriggerType};
use crate::models::resource::{mib_to_bytes, ResourceLimit};
use crate::models::stack::{AutomationPolicy, Stack, StackStatus};
use crate::ports::git::GitPort;
use crate::ports::runtime::RuntimePort;
use crate::ports::store::{AttemptStore, ResourceStore, StackStore};
use crate::settings::OrchestratorSettings;

/// Applies a stack's desired state to the runtime and records the outcome.
///
/// Every mutating operation ends with a re-fetch of the authoritative stack;
/// local state is never merged. Deploy-class operations are not retried:
/// they are side-effecting and a transport error does not prove the trigger
/// was lost.
pub struct DeploymentOrchestrator {
    stacks: Arc<dyn StackStore>,
    attempts: Arc<dyn AttemptStore>,
    resources: Arc<dyn ResourceStore>,
    runtime: Arc<dyn RuntimePort>,
    git: Arc<dyn GitPort>,
    settings: OrchestratorSettings,
}

impl DeploymentOrchestrator {
    pub fn new(
        stacks: Arc<dyn StackStore>,
        attempts: Arc<dyn AttemptStore>,
        resources: Arc<dyn ResourceStore>,
        runtime: Arc<dyn RuntimePort>,
        git: Arc<dyn GitPort>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            stacks,
            attempts,
            resources,
            runtime,
            git,
            settings,
        }
    }

    /// Run a status transition through the FSM; illegal jumps are conflicts
    fn advance(status: StackStatus, event: StackEvent) -> Result<StackStatus> {
        let mut fsm = StackFsm::from_status(status);
        fsm.process(event).map_err(PlatformError::Conflict)?;
        Ok(fsm.status())
    }

    /// Surface a conflict when the backend reports an attempt in flight
    async fn ensure_no_open_attempt(&self, stack_id: &str) -> Result<()> {
        if self.attempts.find_open(stack_id).await?.is_some() {
            return Err(PlatformError::Conflict(
                "A deployment is already in progress for this stack".to_string(),
            ));
        }
        Ok(())
    }

    /// Open a new attempt and move the stack into deploying
    async fn begin_attempt(
        &self,
        stack: &Stack,
        trigger: TriggerType,
    ) -> Result<DeploymentAttempt> {
        let next = Self::advance(stack.status, StackEvent::Deploy)?;
        let attempt = self
            .attempts
            .append(NewAttempt {
                stack_id: stack.id.clone(),
                trigger,
            })
            .await?;
        self.stacks.update_status(&stack.id, next).await?;
        Ok(attempt)
    }

    /// Finish an attempt and settle the stack status from the outcome
    async fn conclude_attempt<T>(
        &self,
        stack_id: &str,
        attempt_id: &str,
        outcome: Result<T>,
    ) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.attempts
                    .finish(attempt_id, AttemptStatus::Succeeded, None)
                    .await?;
                self.stacks
                    .update_status(stack_id, StackStatus::Running)
                    .await?;
                Ok(value)
            }
            Err(e) => {
                let logs = e.to_string();
                self.attempts
                    .finish(attempt_id, AttemptStatus::Failed, Some(&logs))
                    .await?;
                self.stacks
                    .update_status(stack_id, StackStatus::Failed)
                    .await?;
                Err(e)
            }
        }
    }

    /// Execute one compose apply under a recorded attempt
    async fn run_attempt(
        &self,
        stack: &Stack,
        compose: &str,
        trigger: TriggerType,
        service: Option<&str>,
    ) -> Result<Stack> {
        let attempt = self.begin_attempt(stack, trigger).await?;

        let outcome = self
            .runtime
            .apply_compose(stack, compose, &stack.environment, service)
            .await;

        let outcome = match outcome {
            Ok(applied) => {
                // The applied image set becomes the rollback snapshot; a
                // later failed attempt rolls back to this deployment
                if !applied.services.is_empty() {
                    self.stacks
                        .update_stable_images(&stack.id, &applied.services)
                        .await?;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };

        self.conclude_attempt(&stack.id, &attempt.id, outcome)
            .await?;
        self.stacks.get(&stack.id).await
    }

    /// Validate compose content, persist it as the desired state and trigger
    /// a deployment attempt. Supersedes any attempt still tracked as open.
    pub async fn apply(&self, stack_id: &str, compose: &str) -> Result<Stack> {
        if compose.trim().is_empty() {
            return Err(PlatformError::Validation(
                "Compose content must not be empty".to_string(),
            ));
        }

        let mut stack = self.stacks.get(stack_id).await?;

        if let Some(open) = self.attempts.find_open(stack_id).await? {
            warn!(
                "Superseding open deployment attempt {} for stack {}",
                open.id, stack_id
            );
            self.attempts
                .finish(
                    &open.id,
                    AttemptStatus::Failed,
                    Some("Superseded by a newer deployment"),
                )
                .await?;
            self.stacks
                .update_status(stack_id, StackStatus::Failed)
                .await?;
            stack = self.stacks.get(stack_id).await?;
        }

        self.stacks.update_compose(stack_id, compose).await?;
        info!("Applying compose for stack {}", stack_id);
        self.run_attempt(&stack, compose, TriggerType::Manual, None)
            .await
    }

    /// Trigger a new deployment of the current compose content, optionally
    /// scoped to one service. Fails fast when an attempt is already open.
    pub async fn redeploy(&self, stack_id: &str, service: Option<&str>) -> Result<Stack> {
        self.redeploy_with(stack_id, service, TriggerType::Manual)
            .await
    }

    async fn redeploy_with(
        &self,
        stack_id: &str,
        service: Option<&str>,
        trigger: TriggerType,
    ) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;
        self.ensure_no_open_attempt(stack_id).await?;

        let compose = stack.compose_content.clone().ok_or_else(|| {
            PlatformError::Validation("Stack has no compose content".to_string())
        })?;

        info!(
            "Redeploying stack {}{}",
            stack_id,
            service.map(|s| format!(" (service {})", s)).unwrap_or_default()
        );
        self.run_attempt(&stack, &compose, trigger, service).await
    }

    /// Redeploy on behalf of a webhook call. Only the stack's current token
    /// authorizes the trigger; any token issued before the last rotation is
    /// rejected.
    pub async fn trigger_webhook(&self, stack_id: &str, token: &str) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;

        let valid = stack
            .webhook_token
            .as_deref()
            .is_some_and(|current| current == token);
        if !valid {
            return Err(PlatformError::Unauthorized(
                "Invalid webhook token".to_string(),
            ));
        }

        self.redeploy_with(stack_id, None, TriggerType::Webhook)
            .await
    }

    /// Redeploy on behalf of the automation scheduler
    pub async fn run_scheduled(&self, stack_id: &str) -> Result<Stack> {
        self.redeploy_with(stack_id, None, TriggerType::Cron).await
    }

    /// Whether the stack's cron schedule had an occurrence inside the last
    /// poll window. Pure; the embedding scheduler owns the clock.
    pub fn automation_due(stack: &Stack, now: DateTime<Utc>, window: Duration) -> bool {
        let Some(expr) = stack
            .automation
            .cron_schedule
            .as_deref()
            .filter(|s| !s.is_empty())
        else {
            return false;
        };

        let schedule = match Schedule::from_str(expr) {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid cron schedule for stack {}: {}", stack.id, e);
                return false;
            }
        };

        let window = chrono::Duration::from_std(window)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));
        schedule
            .after(&(now - window))
            .next()
            .is_some_and(|occurrence| occurrence <= now)
    }

    /// Request an image build from the stack's current source. Long-running;
    /// returns on acceptance, progress is observed through log streaming.
    pub async fn build(&self, stack_id: &str, service: Option<&str>) -> Result<()> {
        let stack = self.stacks.get(stack_id).await?;
        self.ensure_no_open_attempt(stack_id).await?;

        info!("Triggering build for stack {}", stack_id);
        self.runtime.build(&stack, service).await
    }

    /// Request a replica-count change for one service. Asynchronous on the
    /// cluster side; returns on acceptance. Use `poll_replicas` to observe
    /// convergence.
    pub async fn scale(&self, stack_id: &str, service: &str, replicas: u32) -> Result<()> {
        if service.is_empty() {
            return Err(PlatformError::Validation(
                "Service name must not be empty".to_string(),
            ));
        }

        let stack = self.stacks.get(stack_id).await?;
        info!("Scaling {} / {} to {} replicas", stack_id, service, replicas);
        self.runtime.scale(&stack, service, replicas).await
    }

    /// Bounded poll until the scaled service converges or the configured
    /// staleness window elapses
    pub async fn poll_replicas<S, F>(
        &self,
        stack_id: &str,
        service: &str,
        expected: u32,
        sleep_fn: S,
    ) -> Result<PollOutcome>
    where
        S: Fn(Duration) -> F,
        F: std::future::Future<Output = ()>,
    {
        let stack = self.stacks.get(stack_id).await?;
        let options = PollOptions {
            interval: Duration::from_secs(self.settings.scale_poll_interval_secs),
            timeout: Duration::from_secs(self.settings.scale_poll_timeout_secs),
        };
        poll::poll_replicas(
            self.runtime.as_ref(),
            &stack,
            service,
            expected,
            &options,
            sleep_fn,
        )
        .await
    }

    /// Pull the branch head of the stack's git source, persist the resolved
    /// commit and compose content, and trigger a git-sync deployment attempt
    pub async fn sync_git(&self, stack_id: &str) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;
        self.ensure_no_open_attempt(stack_id).await?;

        let source = stack.git.clone().ok_or_else(|| {
            PlatformError::Validation("Stack is not linked to a git source".to_string())
        })?;

        let commit = self.git.resolve_head(&source.url, &source.branch).await?;
        let compose = self.git.fetch_compose(&source).await?;

        let unchanged = source.last_commit.as_deref() == Some(commit.as_str())
            && stack
                .compose_content
                .as_deref()
                .is_some_and(|current| digest(current) == digest(&compose));
        if unchanged {
            debug!("Stack {} already at {}", stack_id, commit);
            return self.stacks.get(stack_id).await;
        }

        self.stacks.update_git_state(stack_id, &commit).await?;
        self.stacks.update_compose(stack_id, &compose).await?;

        info!("Synced stack {} to commit {}", stack_id, commit);
        self.run_attempt(&stack, &compose, TriggerType::GitSync, None)
            .await
    }

    /// Re-apply the last known stable image set. Typed failure when no
    /// snapshot exists; stack state is left untouched in that case.
    pub async fn rollback(&self, stack_id: &str) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;
        self.ensure_no_open_attempt(stack_id).await?;

        let images = stack
            .last_stable_images
            .clone()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| {
                PlatformError::Validation(
                    "No stable snapshot available for rollback".to_string(),
                )
            })?;

        info!("Rolling back stack {} ({} services)", stack_id, images.len());
        let attempt = self.begin_attempt(&stack, TriggerType::Manual).await?;
        let outcome = self.runtime.apply_images(&stack, &images).await;
        self.conclude_attempt(stack_id, &attempt.id, outcome).await?;
        self.stacks.get(stack_id).await
    }

    /// Replace the automation policy. The health-check interval must honor
    /// the configured floor whenever a health-check path is set.
    pub async fn update_automation(
        &self,
        stack_id: &str,
        policy: &AutomationPolicy,
    ) -> Result<Stack> {
        if let Some(expr) = policy.cron_schedule.as_deref().filter(|s| !s.is_empty()) {
            Schedule::from_str(expr).map_err(|e| {
                PlatformError::Validation(format!("Invalid cron schedule: {}", e))
            })?;
        }

        let floor = self.settings.min_health_check_interval_secs;
        if policy.health_check_path.is_some() && policy.health_check_interval < floor {
            return Err(PlatformError::Validation(format!(
                "Health check interval must be at least {}s",
                floor
            )));
        }

        self.stacks.update_automation(stack_id, policy).await?;
        self.stacks.get(stack_id).await
    }

    /// Rotate the webhook token. The backend swap is atomic; the previous
    /// token stops authorizing immediately.
    pub async fn regenerate_webhook_token(&self, stack_id: &str) -> Result<Stack> {
        let _ = self.stacks.rotate_webhook_token(stack_id).await?;
        self.stacks.get(stack_id).await
    }

    /// Start a stopped stack. The stack re-enters deploying until health
    /// observation settles it.
    pub async fn start(&self, stack_id: &str) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;
        let next = Self::advance(stack.status, StackEvent::Start)?;

        self.runtime.start_containers(&stack).await?;
        self.stacks.update_status(stack_id, next).await?;
        self.stacks.get(stack_id).await
    }

    /// Stop the stack's containers. Refused while an attempt is open: stop
    /// is a new operation, not a cancellation.
    pub async fn stop(&self, stack_id: &str) -> Result<Stack> {
        let stack = self.stacks.get(stack_id).await?;
        self.ensure_no_open_attempt(stack_id).await?;
        let next = Self::advance(stack.status, StackEvent::Stop)?;

        self.runtime.stop_containers(&stack).await?;
        self.stacks.update_status(stack_id, next).await?;
        self.stacks.get(stack_id).await
    }

    /// Remove the stack. Runtime removal goes first; when it fails the
    /// local records are left intact and the error is surfaced.
    pub async fn remove(&self, stack_id: &str) -> Result<()> {
        let stack = self.stacks.get(stack_id).await?;

        self.runtime.remove_stack(&stack).await?;
        self.stacks.delete(stack_id).await?;
        info!("Removed stack {}", stack_id);
        Ok(())
    }

    /// Store a declarative resource limit for one service. Memory is edited
    /// in MiB and persisted in bytes; limits apply on the next redeploy.
    pub async fn set_resource_limit(
        &self,
        stack_id: &str,
        service: &str,
        cpu_limit: Option<f64>,
        memory_mib: Option<u64>,
    ) -> Result<ResourceLimit> {
        if service.is_empty() {
            return Err(PlatformError::Validation(
                "Service name must not be empty".to_string(),
            ));
        }
        if cpu_limit.is_some_and(|cpu| cpu <= 0.0) {
            return Err(PlatformError::Validation(
                "CPU limit must be positive".to_string(),
            ));
        }

        let limit = ResourceLimit {
            stack_id: stack_id.to_string(),
            service_name: service.to_string(),
            cpu_limit,
            memory_limit: memory_mib.map(mib_to_bytes),
        };

        let saved = self.resources.upsert(&limit).await?;
        info!(
            "Limits updated for {} / {}; redeploy to apply",
            stack_id, service
        );
        Ok(saved)
    }

    /// Limits configured for a stack
    pub async fn resource_limits(&self, stack_id: &str) -> Result<Vec<ResourceLimit>> {
        self.resources.list_by_stack(stack_id).await
    }

    /// Deployment history, most recent first
    pub async fn attempt_history(
        &self,
        stack_id: &str,
        limit: u32,
    ) -> Result<Vec<DeploymentAttempt>> {
        self.attempts.list_by_stack(stack_id, limit).await
    }

    /// Observe container health and feed the observation back into the
    /// stack's status where the FSM allows it
    pub async fn refresh_health(&self, stack_id: &str) -> Result<StackHealth> {
        let stack = self.stacks.get(stack_id).await?;
        let containers = self.runtime.list_containers(&stack).await?;
        let health = compute_health(&containers);

        let event = match (stack.status, health.status) {
            (StackStatus::Running, HealthStatus::Degraded) => Some(StackEvent::HealthDegraded),
            (StackStatus::Degraded, HealthStatus::Healthy) => Some(StackEvent::HealthRecovered),
            _ => None,
        };

        if let Some(event) = event {
            let next = Self::advance(stack.status, event)?;
            self.stacks.update_status(stack_id, next).await?;
        }

        Ok(health)
    }
}

/// Hex digest of compose content, for change detection
fn digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}
