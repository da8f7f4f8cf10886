//! Stack models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A compose-based deployment unit owned by a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    /// Unique stack ID
    pub id: String,

    /// Stack name
    pub name: String,

    /// Owning team ID
    pub team_id: String,

    /// Compose definition text; absent until first applied
    pub compose_content: Option<String>,

    /// Deployment status
    pub status: StackStatus,

    /// Webhook trigger token; rotated via the backend
    pub webhook_token: Option<String>,

    /// Automation policy
    #[serde(default)]
    pub automation: AutomationPolicy,

    /// Git source pointer, when the stack is linked to a repository
    pub git: Option<GitSource>,

    /// Last known stable image set, keyed by service name
    pub last_stable_images: Option<BTreeMap<String, String>>,

    /// Desired environment variables passed to compose apply
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Number of containers currently attributed to the stack
    #[serde(default)]
    pub container_count: u32,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Stack {
    /// Whether a rollback target exists
    pub fn has_stable_snapshot(&self) -> bool {
        self.last_stable_images
            .as_ref()
            .is_some_and(|images| !images.is_empty())
    }
}

/// Stack deployment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackStatus {
    /// Created, never applied
    Created,

    /// A deployment attempt is being executed
    Deploying,

    /// All services up
    Running,

    /// Explicitly stopped
    Stopped,

    /// Some but not all services up
    Degraded,

    /// Last deployment attempt failed
    Failed,
}

/// Automation policy for a stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationPolicy {
    /// Cron expression for scheduled redeploys
    pub cron_schedule: Option<String>,

    /// HTTP path polled for health
    pub health_check_path: Option<String>,

    /// Health poll interval in seconds
    #[serde(default)]
    pub health_check_interval: u32,
}

/// Git source pointer for a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    /// Repository URL
    pub url: String,

    /// Branch to track
    pub branch: String,

    /// Path of the compose file inside the repository
    pub compose_path: String,

    /// Commit hash resolved by the last sync
    pub last_commit: Option<String>,
}
