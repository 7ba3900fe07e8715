//! Probe failure taxonomy.

use thiserror::Error;

use crate::health::status::Status;

/// Why a probe invocation failed.
///
/// Every variant names the probe it belongs to so it can be rendered into a
/// [`Status`] without further context. Runners only look at the rendered
/// status; the variant is kept for logging, metrics and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The bounded work did not finish before its deadline.
    #[error("{probe} Timeout")]
    Timeout { probe: String },

    /// The dependency client could not establish a connection.
    #[error("{reason}")]
    Connection { probe: String, reason: String },

    /// Connected, but the liveness command failed.
    #[error("{reason}")]
    LivenessCommand { probe: String, reason: String },

    /// The probe task ended without producing an outcome (panic or abort).
    #[error("probe task aborted: {reason}")]
    Aborted { probe: String, reason: String },
}

impl ProbeError {
    pub fn timeout(probe: impl Into<String>) -> Self {
        ProbeError::Timeout { probe: probe.into() }
    }

    pub fn connection(probe: impl Into<String>, reason: impl Into<String>) -> Self {
        ProbeError::Connection {
            probe: probe.into(),
            reason: reason.into(),
        }
    }

    pub fn liveness_command(probe: impl Into<String>, reason: impl Into<String>) -> Self {
        ProbeError::LivenessCommand {
            probe: probe.into(),
            reason: reason.into(),
        }
    }

    pub fn aborted(probe: impl Into<String>, reason: impl Into<String>) -> Self {
        ProbeError::Aborted {
            probe: probe.into(),
            reason: reason.into(),
        }
    }

    /// Name of the probe that failed.
    pub fn probe(&self) -> &str {
        match self {
            ProbeError::Timeout { probe }
            | ProbeError::Connection { probe, .. }
            | ProbeError::LivenessCommand { probe, .. }
            | ProbeError::Aborted { probe, .. } => probe,
        }
    }

    /// Short label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Timeout { .. } => "timeout",
            ProbeError::Connection { .. } => "connection",
            ProbeError::LivenessCommand { .. } => "liveness_command",
            ProbeError::Aborted { .. } => "aborted",
        }
    }

    /// Render as the unhealthy status reported to callers: `"<probe> - <error>"`.
    pub fn status(&self) -> Status {
        Status::unhealthy(format!("{} - {}", self.probe(), self))
    }
}
