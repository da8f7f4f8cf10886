//! Runtime operation endpoints

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;
use crate::http::client::HttpClient;
use crate::models::container::ContainerSummary;
use crate::models::stack::Stack;
use crate::ports::runtime::{ComposeApplied, RuntimePort};

#[derive(Debug, Serialize)]
struct ApplyRequest<'a> {
    compose_content: &'a str,
    environment: &'a BTreeMap<String, String>,
    service: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ApplyImagesRequest<'a> {
    services: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct BuildRequest<'a> {
    service: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ScaleRequest<'a> {
    service: &'a str,
    replicas: u32,
}

#[async_trait]
impl RuntimePort for HttpClient {
    async fn apply_compose(
        &self,
        stack: &Stack,
        compose: &str,
        env: &BTreeMap<String, String>,
        service: Option<&str>,
    ) -> Result<ComposeApplied> {
        self.post(
            &format!("/stacks/{}/apply", stack.id),
            &ApplyRequest {
                compose_content: compose,
                environment: env,
                service,
            },
        )
        .await
    }

    async fn apply_images(&self, stack: &Stack, images: &BTreeMap<String, String>) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &format!("/stacks/{}/apply-images", stack.id),
                &ApplyImagesRequest { services: images },
            )
            .await?;
        Ok(())
    }

    async fn build(&self, stack: &Stack, service: Option<&str>) -> Result<()> {
        let _: serde_json::Value = self
            .post(&format!("/stacks/{}/build", stack.id), &BuildRequest { service })
            .await?;
        Ok(())
    }

    async fn scale(&self, stack: &Stack, service: &str, replicas: u32) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &format!("/stacks/{}/scale", stack.id),
                &ScaleRequest { service, replicas },
            )
            .await?;
        Ok(())
    }

    async fn list_containers(&self, stack: &Stack) -> Result<Vec<ContainerSummary>> {
        self.get(&format!("/stacks/{}/containers", stack.id)).await
    }

    async fn start_containers(&self, stack: &Stack) -> Result<()> {
        let _: serde_json::Value = self
            .post(&format!("/stacks/{}/start", stack.id), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn stop_containers(&self, stack: &Stack) -> Result<()> {
        let _: serde_json::Value = self
            .post(&format!("/stacks/{}/stop", stack.id), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn remove_stack(&self, stack: &Stack) -> Result<()> {
        self.delete(&format!("/stacks/{}/runtime", stack.id)).await
    }
}
