//! Runtime and compose apply contract

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::container::ContainerSummary;
use crate::models::stack::Stack;

/// Result of an accepted compose apply: the image actually deployed per
/// service. This is the material for the stable rollback snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeApplied {
    /// Applied image per service name
    pub services: BTreeMap<String, String>,
}

/// Operations the orchestration backend runtime exposes.
///
/// Apply, build and scale report acceptance of the trigger, not completion
/// of the underlying cluster operation.
#[async_trait]
pub trait RuntimePort: Send + Sync {
    /// Apply compose text plus an environment map, optionally scoped to one
    /// service. Rejection with a validation error happens before any
    /// container is touched.
    async fn apply_compose(
        &self,
        stack: &Stack,
        compose: &str,
        env: &BTreeMap<String, String>,
        service: Option<&str>,
    ) -> Result<ComposeApplied>;

    /// Re-pin services to an explicit image set (rollback path)
    async fn apply_images(&self, stack: &Stack, images: &BTreeMap<String, String>) -> Result<()>;

    /// Request an image build from the stack's current source
    async fn build(&self, stack: &Stack, service: Option<&str>) -> Result<()>;

    /// Request a replica-count change for one service
    async fn scale(&self, stack: &Stack, service: &str, replicas: u32) -> Result<()>;

    /// Containers currently attributed to the stack
    async fn list_containers(&self, stack: &Stack) -> Result<Vec<ContainerSummary>>;

    /// Start every stopped container of the stack
    async fn start_containers(&self, stack: &Stack) -> Result<()>;

    /// Stop every running container of the stack
    async fn stop_containers(&self, stack: &Stack) -> Result<()>;

    /// Remove the stack's containers from the runtime
    async fn remove_stack(&self, stack: &Stack) -> Result<()>;
}
