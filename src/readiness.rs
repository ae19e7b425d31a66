//! Readiness polling
//!
//! After the stack starts, the sequencer waits a fixed settle delay and
//! then polls backend status within a bounded window: `max_attempts`
//! queries, `interval` apart. The stack is ready as soon as one managed
//! service reports itself up. There is no adaptive backoff and no retry
//! beyond the window.

use std::thread;
use std::time::Duration;

use crate::backend::{ComposeBackend, ServiceStatus};
use crate::config::DeploymentConfig;

/// Outcome of the readiness check. Transient, discarded after reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessResult {
    /// At least one managed service reports up
    Ready,
    /// Stack responded but no service is up yet
    NotReady,
    /// Status query itself failed
    Failed,
}

/// Bounded-wait parameters for the readiness window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPlan {
    pub settle: Duration,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPlan {
    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            settle: config.settle,
            interval: config.poll_interval,
            max_attempts: config.max_attempts,
        }
    }

    /// Upper bound on total wait, for reporting
    pub fn total_wait(&self) -> Duration {
        self.settle + self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Classify one status snapshot.
pub fn classify(services: &[ServiceStatus]) -> ReadinessResult {
    if services.iter().any(ServiceStatus::is_up) {
        ReadinessResult::Ready
    } else {
        ReadinessResult::NotReady
    }
}

/// Poll the backend until ready or the window is exhausted.
///
/// `on_attempt` is invoked after every query so callers can report
/// progress; it never influences the loop.
pub fn wait_until_ready(
    backend: &dyn ComposeBackend,
    plan: &PollPlan,
    mut on_attempt: impl FnMut(u32, ReadinessResult),
) -> ReadinessResult {
    if !plan.settle.is_zero() {
        thread::sleep(plan.settle);
    }

    let mut last = ReadinessResult::NotReady;
    for attempt in 1..=plan.max_attempts {
        last = match backend.ps() {
            Ok(services) => classify(&services),
            Err(_) => ReadinessResult::Failed,
        };
        on_attempt(attempt, last);

        if last == ReadinessResult::Ready {
            return last;
        }
        if attempt < plan.max_attempts && !plan.interval.is_zero() {
            thread::sleep(plan.interval);
        }
    }
    last
}
