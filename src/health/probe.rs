//! The probe capability shared by every dependency check.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::health::error::ProbeError;
use crate::health::status::Status;
use crate::observability::metrics;

/// Something that can report the liveness of one dependency.
///
/// `Ok` always carries a healthy [`Status`]. Every failure, including a
/// timeout, comes back as a [`ProbeError`] whose [`ProbeError::status`] is the
/// normalized unhealthy status.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    async fn check_status(&self) -> Result<Status, ProbeError>;
}

/// Ordered collection of probes; order matters only to the serial runner.
pub type ProbeSet = Vec<Arc<dyn Probe>>;

/// Invoke a probe and fold its result into a [`Status`], recording the outcome.
pub async fn report(probe: &dyn Probe) -> Status {
    let start = Instant::now();
    let result = probe.check_status().await;
    let elapsed = start.elapsed();

    match result {
        Ok(status) if status.is_healthy() => {
            tracing::debug!(
                probe = %probe.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Probe healthy"
            );
            metrics::record_probe(probe.name(), "healthy", elapsed);
            status
        }
        Ok(status) => {
            tracing::warn!(
                probe = %probe.name(),
                message = %status.message(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Probe reported unhealthy status"
            );
            metrics::record_probe(probe.name(), "unhealthy", elapsed);
            status
        }
        Err(e) => {
            tracing::warn!(
                probe = %probe.name(),
                kind = e.kind(),
                error = %e,
                elapsed_ms = elapsed.as_millis() as u64,
                "Probe failed"
            );
            metrics::record_probe(probe.name(), e.kind(), elapsed);
            e.status()
        }
    }
}
