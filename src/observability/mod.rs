//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probes, runners and the HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (probe, mode, elapsed_ms) on every event
//! - Request ID flows through the HTTP trace span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
