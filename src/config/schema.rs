//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::resilience::timeouts::AbandonPolicy;

/// Root configuration for the liveness probe service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// HTTP surface settings.
    pub http: HttpConfig,

    /// Dependency probe settings.
    pub probes: ProbesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Status code returned with an unhealthy verdict.
    ///
    /// Defaults to 200 so callers that parse the body keep working; set to
    /// 503 to let load balancers act on the status code alone.
    pub unhealthy_status: u16,

    /// Upper bound for a whole health check request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            unhealthy_status: 200,
            request_timeout_secs: 30,
        }
    }
}

/// Probe set configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbesConfig {
    /// Artificial delay applied between connect and ping, in seconds.
    /// Used to simulate slow dependencies.
    pub delay_secs: u64,

    /// What happens to probe work that loses a race (timeout or sibling failure).
    pub abandon: AbandonPolicy,

    /// Key-value store (Redis) probe.
    #[serde(deserialize_with = "key_value_section")]
    pub key_value: DependencyConfig,

    /// Document store (MongoDB) probe.
    #[serde(deserialize_with = "document_store_section")]
    pub document_store: DependencyConfig,
}

impl ProbesConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            delay_secs: 0,
            abandon: AbandonPolicy::default(),
            key_value: DependencyConfig::key_value(),
            document_store: DependencyConfig::document_store(),
        }
    }
}

/// A single backing dependency.
///
/// Keys missing from a config section keep that dependency's defaults.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyConfig {
    /// Include this dependency in the probe set.
    pub enabled: bool,

    /// Name used in status messages, logs and metric labels.
    pub name: String,

    /// Host address or connection URL.
    pub address: String,

    /// Probe deadline in whole seconds.
    pub timeout_secs: u64,
}

impl DependencyConfig {
    pub fn key_value() -> Self {
        Self {
            enabled: true,
            name: "KeyValue".to_string(),
            address: "127.0.0.1:6379".to_string(),
            timeout_secs: 1,
        }
    }

    pub fn document_store() -> Self {
        Self {
            enabled: true,
            name: "DocumentStore".to_string(),
            address: "127.0.0.1:27017".to_string(),
            timeout_secs: 2,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The keys actually present in a dependency section.
#[derive(Debug, Default, Deserialize)]
struct DependencySection {
    enabled: Option<bool>,
    name: Option<String>,
    address: Option<String>,
    timeout_secs: Option<u64>,
}

impl DependencySection {
    fn over(self, defaults: DependencyConfig) -> DependencyConfig {
        DependencyConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            name: self.name.unwrap_or(defaults.name),
            address: self.address.unwrap_or(defaults.address),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

fn key_value_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DependencyConfig, D::Error> {
    DependencySection::deserialize(deserializer).map(|section| section.over(DependencyConfig::key_value()))
}

fn document_store_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DependencyConfig, D::Error> {
    DependencySection::deserialize(deserializer).map(|section| section.over(DependencyConfig::document_store()))
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "liveness_probe=info,tower_http=info".to_string(),
            log_format: LogFormat::Compact,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}
