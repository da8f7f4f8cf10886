//! Git source adapter shelling out to the git CLI

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{PlatformError, Result};
use crate::models::stack::GitSource;
use crate::ports::git::GitPort;

/// `GitPort` implementation on the local git binary
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .output()
            .await
            .map_err(|e| PlatformError::RemoteUnavailable(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(PlatformError::RemoteUnavailable(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitPort for GitCli {
    async fn resolve_head(&self, url: &str, branch: &str) -> Result<String> {
        let branch = if branch.is_empty() { "main" } else { branch };
        debug!("Resolving head of {} ({})", url, branch);

        let stdout = Self::run(&["ls-remote", url, &format!("refs/heads/{}", branch)]).await?;
        let commit = stdout
            .split_whitespace()
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                PlatformError::NotFound(format!("Branch '{}' not found in {}", branch, url))
            })?;

        Ok(commit.to_string())
    }

    async fn fetch_compose(&self, source: &GitSource) -> Result<String> {
        let branch = if source.branch.is_empty() {
            "main"
        } else {
            &source.branch
        };
        debug!(
            "Fetching {} at {} ({})",
            source.compose_path, source.url, branch
        );

        // Blobless shallow clone into a scratch directory, read the one file
        let scratch = std::env::temp_dir().join(format!("berth-git-{}", uuid::Uuid::new_v4()));
        let scratch_str = scratch.to_string_lossy().to_string();

        let clone = Self::run(&[
            "clone",
            "--depth",
            "1",
            "--branch",
            branch,
            &source.url,
            &scratch_str,
        ])
        .await;

        let content = match clone {
            Ok(_) => tokio::fs::read_to_string(scratch.join(&source.compose_path))
                .await
                .map_err(|e| {
                    PlatformError::NotFound(format!(
                        "Failed to read compose file from repo: {}",
                        e
                    ))
                }),
            Err(e) => Err(e),
        };

        let _ = tokio::fs::remove_dir_all(&scratch).await;
        content
    }
}
