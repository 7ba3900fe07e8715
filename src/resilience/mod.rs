//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe invocation:
//!     → timeouts.rs (spawn work, race against deadline)
//!     → success, dependency error, or Timeout
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every dependency call has a deadline
//! - No retries: a failed probe is terminal for that check cycle

pub mod timeouts;

pub use timeouts::{AbandonPolicy, TimeoutGuard};
