//! Timeout enforcement.
//!
//! # Responsibilities
//! - Run a unit of probe work on its own task
//! - Race its completion against a deadline
//! - Decide the fate of work that loses the race
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities over a single-slot oneshot channel;
//!   a late sender never blocks
//! - Timeout errors are distinct from other errors and carry the probe name
//! - Abandoned work is aborted by default so its connection is dropped;
//!   `AbandonPolicy::Detach` lets it finish and discards the result

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinSet};
use tokio::time;

use crate::health::error::ProbeError;

/// What to do with work that is no longer awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AbandonPolicy {
    /// Abort the task; dropping its future releases whatever it holds.
    #[default]
    Abort,
    /// Let the task run to completion in the background and discard its result.
    /// Costs at most one task and one connection per abandoned probe.
    Detach,
}

/// Bounds a unit of work by a wall-clock deadline.
#[derive(Debug, Clone)]
pub struct TimeoutGuard {
    name: String,
    deadline: Duration,
    policy: AbandonPolicy,
}

impl TimeoutGuard {
    pub fn new(name: impl Into<String>, deadline: Duration) -> Self {
        Self {
            name: name.into(),
            deadline,
            policy: AbandonPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AbandonPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Spawn `work` and wait for it until the deadline.
    ///
    /// A zero deadline fails unless the work is already done when first polled.
    pub async fn run<F>(&self, work: F) -> Result<F::Output, ProbeError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let mut scope = TaskScope::new(self.policy);
        scope.spawn(async move {
            let output = work.await;
            // Receiver is gone once the guard gave up.
            let _ = tx.send(output);
        });

        match time::timeout(self.deadline, rx).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(_)) => {
                let reason = match scope.join_next().await {
                    Some(Err(e)) if e.is_panic() => "panicked".to_string(),
                    Some(Err(e)) => e.to_string(),
                    _ => "finished without a result".to_string(),
                };
                tracing::error!(probe = %self.name, reason = %reason, "Probe work ended abnormally");
                Err(ProbeError::aborted(&self.name, reason))
            }
            Err(_) => {
                tracing::warn!(
                    probe = %self.name,
                    deadline_ms = self.deadline.as_millis() as u64,
                    policy = ?self.policy,
                    "Probe timed out"
                );
                Err(ProbeError::timeout(&self.name))
            }
        }
    }
}

/// Tasks spawned on behalf of a caller that may stop waiting for them.
///
/// Dropping a `JoinSet` aborts its tasks, which also covers the caller's own
/// future being dropped mid-wait. Under `Detach` the tasks are released first.
pub(crate) struct TaskScope {
    tasks: JoinSet<()>,
    policy: AbandonPolicy,
}

impl TaskScope {
    pub(crate) fn new(policy: AbandonPolicy) -> Self {
        Self {
            tasks: JoinSet::new(),
            policy,
        }
    }

    pub(crate) fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Wait for the next task to finish.
    async fn join_next(&mut self) -> Option<Result<(), JoinError>> {
        self.tasks.join_next().await
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if self.policy == AbandonPolicy::Detach {
            self.tasks.detach_all();
        }
    }
}
