//! Key-value store (Redis) probe.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use crate::config::{DependencyConfig, ProbesConfig};
use crate::health::dependency::{
    sanitize_url, DependencyClient, DependencyProbe, DependencySession, SessionError,
};

pub type KeyValueStoreProbe = DependencyProbe<RedisClient>;

/// Build the key-value probe from configuration.
pub fn key_value_store_probe(config: &DependencyConfig, probes: &ProbesConfig) -> KeyValueStoreProbe {
    let client = RedisClient::new(&config.address);
    tracing::info!(
        probe = %config.name,
        url = %sanitize_url(client.url()),
        timeout_secs = config.timeout_secs,
        "Key-value probe configured"
    );
    DependencyProbe::new(&config.name, client, config.timeout())
        .with_delay(probes.delay())
        .with_policy(probes.abandon)
}

/// Dials a fresh connection per check.
#[derive(Debug, Clone)]
pub struct RedisClient {
    url: String,
}

impl RedisClient {
    /// Accepts a `redis://` URL or a bare `host:port`.
    pub fn new(address: &str) -> Self {
        let address = address.trim();
        let url = if address.contains("://") {
            address.to_string()
        } else {
            format!("redis://{}", address)
        };
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct RedisSession {
    conn: MultiplexedConnection,
}

#[async_trait]
impl DependencyClient for RedisClient {
    type Session = RedisSession;

    async fn connect(&self) -> Result<RedisSession, String> {
        let client = redis::Client::open(self.url.as_str()).map_err(|e| e.to_string())?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| e.to_string())?;
        Ok(RedisSession { conn })
    }
}

#[async_trait]
impl DependencySession for RedisSession {
    async fn ping(&mut self) -> Result<(), SessionError> {
        let reply: String = redis::cmd("PING")
            .query_async(&mut self.conn)
            .await
            .map_err(|e| {
                if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
                    SessionError::Connection(e.to_string())
                } else {
                    SessionError::Command(e.to_string())
                }
            })?;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(SessionError::Command(format!("unexpected PING reply '{}'", reply)))
        }
    }

    async fn close(self) {
        // The multiplexed connection shuts down once its last handle is dropped.
        drop(self.conn);
    }
}
