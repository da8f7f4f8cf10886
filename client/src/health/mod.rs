//! Stack health evaluation

use serde::{Deserialize, Serialize};

use crate::models::container::{ContainerState, ContainerSummary};

/// Stack-level health derived from container states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every container is running
    Healthy,

    /// Some but not all containers are running
    Degraded,

    /// No container is running
    Down,
}

/// Per-container slice of a health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerHealth {
    pub id: String,
    pub name: String,
    pub state: ContainerState,
    pub status: String,
}

/// Health report for one stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackHealth {
    pub status: HealthStatus,
    pub healthy_count: u32,
    pub total_count: u32,
    pub containers: Vec<ContainerHealth>,
}

/// Derive stack health from the given container states. Pure: no memory of
/// prior polls, no scheduler; the caller owns the poll cadence.
pub fn compute_health(containers: &[ContainerSummary]) -> StackHealth {
    let total = containers.len() as u32;
    let running = containers.iter().filter(|c| c.state.is_running()).count() as u32;

    let status = if total > 0 && running == total {
        HealthStatus::Healthy
    } else if running > 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Down
    };

    StackHealth {
        status,
        healthy_count: running,
        total_count: total,
        containers: containers
            .iter()
            .map(|c| ContainerHealth {
                id: c.id.clone(),
                name: c.names.first().cloned().unwrap_or_default(),
                state: c.state,
                status: c.status.clone(),
            })
            .collect(),
    }
}
