//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status codes, timeouts, addresses)
//! - Keep the request timeout above the worst-case serial check
//! - Detect probe name collisions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{DependencyConfig, ProbeConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': expected host:port")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0}: probe name must not be empty")]
    EmptyProbeName(&'static str),

    #[error("{0}: dependency address must not be empty")]
    EmptyDependencyAddress(&'static str),

    #[error("duplicate probe name '{0}'")]
    DuplicateProbeName(String),

    #[error("http.unhealthy_status {0} is outside 200..=599")]
    InvalidStatusCode(u16),

    #[error("http.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("http.request_timeout_secs {request_timeout_secs} must exceed the {probe_budget_secs}s the enabled probes may take in series")]
    RequestTimeoutTooShort { request_timeout_secs: u64, probe_budget_secs: u64 },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !(200..=599).contains(&config.http.unhealthy_status) {
        errors.push(ValidationError::InvalidStatusCode(config.http.unhealthy_status));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let probes = [
        ("probes.key_value", &config.probes.key_value),
        ("probes.document_store", &config.probes.document_store),
    ];
    let mut seen: Vec<&str> = Vec::new();
    for (section, dependency) in probes {
        if !dependency.enabled {
            continue;
        }
        validate_dependency(section, dependency, &mut errors);
        if seen.contains(&dependency.name.as_str()) {
            errors.push(ValidationError::DuplicateProbeName(dependency.name.clone()));
        }
        seen.push(&dependency.name);
    }

    // Delay runs inside each probe's deadline, so the deadlines bound a serial check.
    let probe_budget_secs: u64 = [&config.probes.key_value, &config.probes.document_store]
        .iter()
        .filter(|dependency| dependency.enabled)
        .map(|dependency| dependency.timeout_secs)
        .sum();
    if config.http.request_timeout_secs > 0 && config.http.request_timeout_secs <= probe_budget_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_timeout_secs: config.http.request_timeout_secs,
            probe_budget_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A socket address or a `host:port` pair the listener can resolve.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok(),
        None => false,
    }
}

fn validate_dependency(
    section: &'static str,
    dependency: &DependencyConfig,
    errors: &mut Vec<ValidationError>,
) {
    if dependency.name.trim().is_empty() {
        errors.push(ValidationError::EmptyProbeName(section));
    }
    if dependency.address.trim().is_empty() {
        errors.push(ValidationError::EmptyDependencyAddress(section));
    }
}
