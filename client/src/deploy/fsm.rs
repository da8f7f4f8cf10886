//! Finite state machine for stack deployment status

use crate::models::stack::StackStatus;

/// Stack lifecycle event
#[derive(Debug, Clone)]
pub enum StackEvent {
    /// A deployment attempt was accepted (apply, redeploy, build result,
    /// rollback or git sync)
    Deploy,

    /// The deployment attempt finished successfully
    DeploySucceeded,

    /// The deployment attempt failed
    DeployFailed(String),

    /// Stop the stack's containers
    Stop,

    /// Start a stopped stack
    Start,

    /// Health observation: some but not all containers running
    HealthDegraded,

    /// Health observation: all containers running again
    HealthRecovered,
}

/// Stack status FSM
#[derive(Debug, Clone)]
pub struct StackFsm {
    status: StackStatus,
    error: Option<String>,
}

impl StackFsm {
    /// Create a new FSM for a freshly created stack
    pub fn new() -> Self {
        Self {
            status: StackStatus::Created,
            error: None,
        }
    }

    /// Resume from a known status
    pub fn from_status(status: StackStatus) -> Self {
        Self {
            status,
            error: None,
        }
    }

    /// Get current status
    pub fn status(&self) -> StackStatus {
        self.status
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Process an event and transition status
    pub fn process(&mut self, event: StackEvent) -> Result<(), String> {
        let new_status = match (self.status, &event) {
            // Deployment attempts are accepted from every settled state;
            // failed, degraded and stopped stacks recover by redeploying
            (StackStatus::Created, StackEvent::Deploy)
            | (StackStatus::Running, StackEvent::Deploy)
            | (StackStatus::Failed, StackEvent::Deploy)
            | (StackStatus::Degraded, StackEvent::Deploy)
            | (StackStatus::Stopped, StackEvent::Deploy) => {
                self.error = None;
                StackStatus::Deploying
            }

            // From Deploying
            (StackStatus::Deploying, StackEvent::DeploySucceeded) => StackStatus::Running,
            (StackStatus::Deploying, StackEvent::DeployFailed(err)) => {
                self.error = Some(err.clone());
                StackStatus::Failed
            }

            // Stop is a new operation, never a cancellation; an accepted
            // attempt cannot be stopped mid-flight
            (StackStatus::Running, StackEvent::Stop)
            | (StackStatus::Failed, StackEvent::Stop)
            | (StackStatus::Degraded, StackEvent::Stop) => StackStatus::Stopped,

            // From Stopped
            (StackStatus::Stopped, StackEvent::Start) => StackStatus::Deploying,

            // Health observations
            (StackStatus::Running, StackEvent::HealthDegraded) => StackStatus::Degraded,
            (StackStatus::Degraded, StackEvent::HealthRecovered) => StackStatus::Running,

            // Invalid transitions
            (status, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", status, event));
            }
        };

        self.status = new_status;
        Ok(())
    }
}

impl Default for StackFsm {
    fn default() -> Self {
        Self::new()
    }
}
