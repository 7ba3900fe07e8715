//! Serial and parallel probe runners.
//!
//! # Data Flow
//! ```text
//! Serial:
//!     probe[0] → probe[1] → ... (stop at first unhealthy)
//!
//! Parallel:
//!     spawn every probe
//!     → unhealthy channel: first message ends the check
//!     → healthy channel: count until every probe has confirmed
//! ```
//!
//! # Design Decisions
//! - Runners only look at `Status::is_healthy`, never the error kind
//! - `Ok(())` is overall success; `Err(status)` is the failure that decided it
//! - Simultaneous parallel failures report whichever was observed first

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::health::probe::{report, Probe};
use crate::health::status::Status;
use crate::resilience::timeouts::{AbandonPolicy, TaskScope};

/// Runs probes one after another, short-circuiting on the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialRunner;

impl SerialRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, probes: &[Arc<dyn Probe>]) -> Result<(), Status> {
        for probe in probes {
            let status = report(probe.as_ref()).await;
            if !status.is_healthy() {
                return Err(status);
            }
        }
        Ok(())
    }
}

/// Runs all probes concurrently; the first failure wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelRunner {
    policy: AbandonPolicy,
}

impl ParallelRunner {
    /// `policy` decides whether probes still in flight after the verdict are
    /// aborted or left to finish on their own.
    pub fn new(policy: AbandonPolicy) -> Self {
        Self { policy }
    }

    pub async fn run(&self, probes: &[Arc<dyn Probe>]) -> Result<(), Status> {
        let total = probes.len();
        if total == 0 {
            return Ok(());
        }

        // Room for every probe, so a send after the verdict never waits.
        let (unhealthy_tx, mut unhealthy_rx) = mpsc::channel::<Status>(total);
        let (healthy_tx, mut healthy_rx) = mpsc::channel::<Status>(total);

        let mut scope = TaskScope::new(self.policy);
        for probe in probes {
            let probe = probe.clone();
            let unhealthy_tx = unhealthy_tx.clone();
            let healthy_tx = healthy_tx.clone();
            scope.spawn(async move {
                let status = report(probe.as_ref()).await;
                let tx = if status.is_healthy() { healthy_tx } else { unhealthy_tx };
                let _ = tx.send(status).await;
            });
        }
        drop(unhealthy_tx);
        drop(healthy_tx);

        let mut confirmed = 0;
        loop {
            tokio::select! {
                biased;

                Some(status) = unhealthy_rx.recv() => return Err(status),

                received = healthy_rx.recv() => match received {
                    Some(_) => {
                        confirmed += 1;
                        if confirmed == total {
                            return Ok(());
                        }
                    }
                    None => {
                        tracing::error!(
                            confirmed,
                            total,
                            "Probe tasks exited without reporting"
                        );
                        return Err(Status::unhealthy(format!(
                            "{} of {} probes exited without reporting",
                            total - confirmed,
                            total
                        )));
                    }
                },
            }
        }
    }
}
