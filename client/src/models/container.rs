//! Container observation models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Read-only view of a container as reported by the runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Runtime container ID
    pub id: String,

    /// Container names
    pub names: Vec<String>,

    /// Image reference
    pub image: String,

    /// Lifecycle state
    pub state: ContainerState,

    /// Human-readable status text
    #[serde(default)]
    pub status: String,

    /// Container labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerSummary {
    /// Service name derived from labels, falling back to the first name
    pub fn service_name(&self) -> Option<String> {
        if let Some(name) = self.labels.get("berth.service.name") {
            return Some(name.clone());
        }
        self.names
            .first()
            .map(|n| n.trim_start_matches('/').to_string())
    }
}

/// Container lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Exited,
    Created,
    Restarting,
    Paused,
    Dead,
    #[serde(other)]
    Unknown,
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}
