//! Outcome of a single probe invocation.

use std::fmt;

const UNKNOWN_FAILURE: &str = "unknown failure";

/// Immutable health outcome of one probe invocation.
///
/// A healthy status always carries an empty message; an unhealthy one never
/// does. Fields are private so the pairing cannot be broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    healthy: bool,
    message: String,
}

impl Status {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: String::new(),
        }
    }

    /// An unhealthy status. An empty message is replaced with a placeholder.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_FAILURE.to_string()
        } else {
            message
        };
        Self {
            healthy: false,
            message,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            write!(f, "healthy")
        } else {
            write!(f, "unhealthy: {}", self.message)
        }
    }
}
