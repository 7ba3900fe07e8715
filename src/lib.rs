//! Liveness aggregation probe.
//!
//! Checks a fixed set of backing dependencies (a Redis key-value store and a
//! MongoDB document store), bounds each check with a deadline and reports one
//! aggregate verdict plus the elapsed time over HTTP.

// Core subsystems
pub mod config;
pub mod health;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::ProbeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
