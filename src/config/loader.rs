//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProbeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables consulted after the file is parsed.
pub const ENV_WEB_SERVER_PORT: &str = "WEB_SERVER_PORT";
pub const ENV_MONGO_HOST: &str = "MONGO_HOST";
pub const ENV_MONGO_TIMEOUT: &str = "MONGO_TIMEOUT";
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_TIMEOUT: &str = "REDIS_TIMEOUT";
pub const ENV_WAIT: &str = "WAIT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Environment error: {}='{}' is not a whole number of seconds", var, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => ProbeConfig::default(),
    };

    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment values onto a parsed configuration.
///
/// `lookup` returns the value of a variable, if set.
pub fn apply_env_overrides<F>(mut config: ProbeConfig, lookup: F) -> Result<ProbeConfig, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    if let Some(port) = lookup(ENV_WEB_SERVER_PORT) {
        config.listener.bind_address = bind_address_from(&port);
    }
    if let Some(host) = lookup(ENV_MONGO_HOST) {
        config.probes.document_store.address = host;
    }
    if let Some(host) = lookup(ENV_REDIS_HOST) {
        config.probes.key_value.address = host;
    }
    if let Some(secs) = lookup(ENV_MONGO_TIMEOUT) {
        config.probes.document_store.timeout_secs = parse_secs(ENV_MONGO_TIMEOUT, secs)?;
    }
    if let Some(secs) = lookup(ENV_REDIS_TIMEOUT) {
        config.probes.key_value.timeout_secs = parse_secs(ENV_REDIS_TIMEOUT, secs)?;
    }
    if let Some(secs) = lookup(ENV_WAIT) {
        config.probes.delay_secs = parse_secs(ENV_WAIT, secs)?;
    }
    Ok(config)
}

/// Accepts ":8080", "8080" or a full "host:port".
fn bind_address_from(value: &str) -> String {
    let value = value.trim();
    if let Some(port) = value.strip_prefix(':') {
        format!("0.0.0.0:{}", port)
    } else if value.parse::<u16>().is_ok() {
        format!("0.0.0.0:{}", value)
    } else {
        value.to_string()
    }
}

fn parse_secs(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
