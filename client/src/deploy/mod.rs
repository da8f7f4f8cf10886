//! Deployment orchestration

pub mod fsm;
pub mod orchestrator;
pub mod poll;

pub use fsm::{StackEvent, StackFsm};
pub use orchestrator::DeploymentOrchestrator;
pub use poll::{poll_replicas, PollOptions, PollOutcome};
