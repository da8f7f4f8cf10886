//! Bounded re-polling after asynchronous scale triggers

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::errors::Result;
use crate::models::stack::Stack;
use crate::ports::runtime::RuntimePort;

/// Poll tuning
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between container re-polls
    pub interval: Duration,

    /// Upper bound on the whole poll loop
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Final observation of a poll loop
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Whether the observed replica count reached the expected count
    pub converged: bool,

    /// Running replicas observed last
    pub running: u32,

    /// Replicas that were expected
    pub expected: u32,
}

/// Re-poll container state until the service reaches the expected replica
/// count or the timeout elapses. Scale has no synchronous completion signal,
/// so this is the explicit staleness bound. Sleeping is injected so tests
/// run without timers.
pub async fn poll_replicas<S, F>(
    runtime: &dyn RuntimePort,
    stack: &Stack,
    service: &str,
    expected: u32,
    options: &PollOptions,
    sleep_fn: S,
) -> Result<PollOutcome>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let interval = options.interval.max(Duration::from_millis(1));
    let rounds = (options.timeout.as_millis() / interval.as_millis()).max(1) as u32;

    let mut running = observe(runtime, stack, service).await?;

    for round in 0..rounds {
        if running == expected {
            return Ok(PollOutcome {
                converged: true,
                running,
                expected,
            });
        }

        debug!(
            "Service {} at {}/{} replicas (poll {}/{})",
            service,
            running,
            expected,
            round + 1,
            rounds
        );
        sleep_fn(interval).await;
        running = observe(runtime, stack, service).await?;
    }

    Ok(PollOutcome {
        converged: running == expected,
        running,
        expected,
    })
}

async fn observe(runtime: &dyn RuntimePort, stack: &Stack, service: &str) -> Result<u32> {
    let containers = runtime.list_containers(stack).await?;
    let running = containers
        .iter()
        .filter(|c| c.state.is_running() && c.service_name().as_deref() == Some(service))
        .count();
    Ok(running as u32)
}
