//! Stack, attempt and resource endpoints

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::http::client::HttpClient;
use crate::models::deployment::{AttemptStatus, DeploymentAttempt, NewAttempt};
use crate::models::resource::ResourceLimit;
use crate::models::stack::{AutomationPolicy, Stack, StackStatus};
use crate::ports::store::{AttemptStore, ResourceStore, StackStore};

#[derive(Debug, Serialize)]
struct ComposeUpdate<'a> {
    compose_content: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: StackStatus,
}

#[derive(Debug, Serialize)]
struct GitStateUpdate<'a> {
    last_commit: &'a str,
}

#[derive(Debug, Serialize)]
struct StableImagesUpdate<'a> {
    services: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[async_trait]
impl StackStore for HttpClient {
    async fn get(&self, stack_id: &str) -> Result<Stack> {
        self.get(&format!("/stacks/{}", stack_id)).await
    }

    async fn list_by_team(&self, team_id: &str) -> Result<Vec<Stack>> {
        self.get(&format!("/teams/{}/stacks", team_id)).await
    }

    async fn update_compose(&self, stack_id: &str, compose: &str) -> Result<()> {
        let _: serde_json::Value = self
            .put(
                &format!("/stacks/{}/compose", stack_id),
                &ComposeUpdate {
                    compose_content: compose,
                },
            )
            .await?;
        Ok(())
    }

    async fn update_status(&self, stack_id: &str, status: StackStatus) -> Result<()> {
        let _: serde_json::Value = self
            .put(&format!("/stacks/{}/status", stack_id), &StatusUpdate { status })
            .await?;
        Ok(())
    }

    async fn update_automation(&self, stack_id: &str, policy: &AutomationPolicy) -> Result<()> {
        let _: serde_json::Value = self
            .put(&format!("/stacks/{}/automation", stack_id), policy)
            .await?;
        Ok(())
    }

    async fn update_git_state(&self, stack_id: &str, commit: &str) -> Result<()> {
        let _: serde_json::Value = self
            .put(
                &format!("/stacks/{}/git", stack_id),
                &GitStateUpdate { last_commit: commit },
            )
            .await?;
        Ok(())
    }

    async fn update_stable_images(
        &self,
        stack_id: &str,
        images: &BTreeMap<String, String>,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .put(
                &format!("/stacks/{}/stable-images", stack_id),
                &StableImagesUpdate { services: images },
            )
            .await?;
        Ok(())
    }

    async fn rotate_webhook_token(&self, stack_id: &str) -> Result<String> {
        let response: TokenResponse = self
            .post(
                &format!("/stacks/{}/webhook-token/rotate", stack_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(response.token)
    }

    async fn delete(&self, stack_id: &str) -> Result<()> {
        self.delete(&format!("/stacks/{}", stack_id)).await
    }
}

#[derive(Debug, Serialize)]
struct AttemptFinish<'a> {
    status: AttemptStatus,
    logs: Option<&'a str>,
}

#[async_trait]
impl AttemptStore for HttpClient {
    async fn append(&self, new: NewAttempt) -> Result<DeploymentAttempt> {
        self.post(&format!("/stacks/{}/deployments", new.stack_id), &new)
            .await
    }

    async fn finish(
        &self,
        attempt_id: &str,
        status: AttemptStatus,
        logs: Option<&str>,
    ) -> Result<DeploymentAttempt> {
        self.patch(
            &format!("/deployments/{}", attempt_id),
            &AttemptFinish { status, logs },
        )
        .await
    }

    async fn list_by_stack(&self, stack_id: &str, limit: u32) -> Result<Vec<DeploymentAttempt>> {
        self.get(&format!("/stacks/{}/deployments?limit={}", stack_id, limit))
            .await
    }

    async fn find_open(&self, stack_id: &str) -> Result<Option<DeploymentAttempt>> {
        self.get(&format!("/stacks/{}/deployments/open", stack_id))
            .await
    }
}

#[async_trait]
impl ResourceStore for HttpClient {
    async fn list_by_stack(&self, stack_id: &str) -> Result<Vec<ResourceLimit>> {
        self.get(&format!("/stacks/{}/resources", stack_id)).await
    }

    async fn upsert(&self, limit: &ResourceLimit) -> Result<ResourceLimit> {
        self.put(
            &format!("/stacks/{}/resources/{}", limit.stack_id, limit.service_name),
            limit,
        )
        .await
    }

    async fn remove(&self, stack_id: &str, service_name: &str) -> Result<()> {
        self.delete(&format!("/stacks/{}/resources/{}", stack_id, service_name))
            .await
    }
}
