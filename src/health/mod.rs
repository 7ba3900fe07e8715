//! Dependency health checking subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (pick serial or parallel, time the check)
//!     → runner.rs (SerialRunner / ParallelRunner)
//!     → probe.rs (Probe::check_status per dependency)
//!     → dependency.rs (connect, delay, ping inside a TimeoutGuard)
//!     → key_value.rs / document_store.rs (Redis / MongoDB clients)
//!     → verdict.rs (render "WORKING <N> ms" or the failure)
//! ```
//!
//! # Design Decisions
//! - Health is boolean per dependency and boolean overall
//! - Every failure is normalized into an unhealthy Status at the probe boundary
//! - No retries and no caching: each request probes afresh

pub mod dependency;
#[cfg(feature = "mongodb")]
pub mod document_store;
pub mod error;
#[cfg(feature = "redis")]
pub mod key_value;
pub mod probe;
pub mod runner;
pub mod service;
pub mod status;
pub mod verdict;

pub use dependency::{DependencyClient, DependencyProbe, DependencySession, SessionError};
#[cfg(feature = "mongodb")]
pub use document_store::{DocumentStoreProbe, MongoClient};
pub use error::ProbeError;
#[cfg(feature = "redis")]
pub use key_value::{KeyValueStoreProbe, RedisClient};
pub use probe::{Probe, ProbeSet};
pub use runner::{ParallelRunner, SerialRunner};
pub use service::HealthService;
pub use status::Status;
pub use verdict::{CheckMode, Verdict};
