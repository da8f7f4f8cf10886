//! Deployment attempt models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded execution of applying a stack's desired state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentAttempt {
    /// Unique attempt ID
    pub id: String,

    /// Owning stack ID
    pub stack_id: String,

    /// What caused the attempt
    pub trigger: TriggerType,

    /// Attempt status
    pub status: AttemptStatus,

    /// Captured log text, attached when the attempt finishes
    pub logs: Option<String>,

    /// Start timestamp; ordering key for deployment history
    pub started_at: DateTime<Utc>,

    /// Finish timestamp, absent while the attempt is open
    pub finished_at: Option<DateTime<Utc>>,
}

impl DeploymentAttempt {
    /// Whether the attempt is still open (pending or running)
    pub fn is_open(&self) -> bool {
        matches!(self.status, AttemptStatus::Pending | AttemptStatus::Running)
    }
}

/// Cause of a deployment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerType {
    Manual,
    Webhook,
    Cron,
    GitSync,
}

/// Status of a deployment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Request payload for appending a new attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttempt {
    /// Owning stack ID
    pub stack_id: String,

    /// What caused the attempt
    pub trigger: TriggerType,
}
