//! Health check service: the probe set plus both execution strategies.

use std::sync::Arc;

use crate::config::ProbesConfig;
use crate::health::probe::{Probe, ProbeSet};
use crate::health::runner::{ParallelRunner, SerialRunner};
use crate::health::verdict::{CheckMode, Verdict};
use crate::observability::metrics;

/// Owns the probe set and runs checks against it.
#[derive(Clone)]
pub struct HealthService {
    probes: Arc<ProbeSet>,
    serial: SerialRunner,
    parallel: ParallelRunner,
}

impl HealthService {
    pub fn new(probes: ProbeSet, parallel: ParallelRunner) -> Self {
        Self {
            probes: Arc::new(probes),
            serial: SerialRunner::new(),
            parallel,
        }
    }

    /// Build the configured dependency probes.
    pub fn from_config(config: &ProbesConfig) -> Self {
        Self::new(build_probes(config), ParallelRunner::new(config.abandon))
    }

    pub fn probes(&self) -> &[Arc<dyn Probe>] {
        &self.probes
    }

    /// Run one check in the given mode.
    pub async fn check(&self, mode: CheckMode) -> Verdict {
        let verdict = match mode {
            CheckMode::Serial => Verdict::measure(mode, self.serial.run(&self.probes)).await,
            CheckMode::Parallel => Verdict::measure(mode, self.parallel.run(&self.probes)).await,
        };

        match verdict.failure() {
            None => tracing::info!(
                mode = %mode,
                elapsed_ms = verdict.elapsed_ms() as u64,
                "Health check passed"
            ),
            Some(status) => tracing::warn!(
                mode = %mode,
                elapsed_ms = verdict.elapsed_ms() as u64,
                failure = %status.message(),
                "Health check failed"
            ),
        }
        metrics::record_check(mode.as_str(), verdict.is_healthy(), verdict.elapsed());

        verdict
    }
}

/// Key-value store first, then document store.
pub fn build_probes(config: &ProbesConfig) -> ProbeSet {
    let mut probes: ProbeSet = Vec::new();

    if config.key_value.enabled {
        #[cfg(feature = "redis")]
        probes.push(Arc::new(crate::health::key_value::key_value_store_probe(&config.key_value, config)));
        #[cfg(not(feature = "redis"))]
        tracing::warn!(probe = %config.key_value.name, "Built without the redis feature; probe skipped");
    }

    if config.document_store.enabled {
        #[cfg(feature = "mongodb")]
        probes.push(Arc::new(crate::health::document_store::document_store_probe(&config.document_store, config)));
        #[cfg(not(feature = "mongodb"))]
        tracing::warn!(probe = %config.document_store.name, "Built without the mongodb feature; probe skipped");
    }

    if probes.is_empty() {
        tracing::warn!("No dependency probes configured; every check will report WORKING");
    }
    probes
}
