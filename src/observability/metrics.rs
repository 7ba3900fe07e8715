//! Metrics collection and exposition.
//!
//! # Metrics
//! - `liveness_probe_checks_total` (counter): checks by mode, outcome
//! - `liveness_probe_check_duration_seconds` (histogram): check latency by mode
//! - `liveness_probe_probe_total` (counter): probe invocations by probe, outcome
//! - `liveness_probe_probe_duration_seconds` (histogram): probe latency
//! - `liveness_probe_dependency_up` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed exporter every call is a no-op
//! - Probe outcome label is the failure kind (timeout, connection, ...) or "healthy"

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one aggregate check.
pub fn record_check(mode: &'static str, healthy: bool, elapsed: Duration) {
    let outcome = if healthy { "healthy" } else { "unhealthy" };
    counter!("liveness_probe_checks_total", "mode" => mode, "outcome" => outcome).increment(1);
    histogram!("liveness_probe_check_duration_seconds", "mode" => mode).record(elapsed.as_secs_f64());
}

/// Record one probe invocation.
pub fn record_probe(probe: &str, outcome: &'static str, elapsed: Duration) {
    let probe = probe.to_string();
    counter!("liveness_probe_probe_total", "probe" => probe.clone(), "outcome" => outcome).increment(1);
    histogram!("liveness_probe_probe_duration_seconds", "probe" => probe.clone()).record(elapsed.as_secs_f64());
    let up = if outcome == "healthy" { 1.0 } else { 0.0 };
    gauge!("liveness_probe_dependency_up", "probe" => probe).set(up);
}
