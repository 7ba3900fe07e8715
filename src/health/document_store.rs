//! Document store (MongoDB) probe.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::config::{DependencyConfig, ProbesConfig};
use crate::health::dependency::{
    sanitize_url, DependencyClient, DependencyProbe, DependencySession, SessionError,
};

pub type DocumentStoreProbe = DependencyProbe<MongoClient>;

const APP_NAME: &str = "liveness-probe";

/// Build the document-store probe from configuration.
pub fn document_store_probe(config: &DependencyConfig, probes: &ProbesConfig) -> DocumentStoreProbe {
    let client = MongoClient::new(&config.address);
    tracing::info!(
        probe = %config.name,
        uri = %sanitize_url(client.uri()),
        timeout_secs = config.timeout_secs,
        "Document store probe configured"
    );
    DependencyProbe::new(&config.name, client, config.timeout())
        .with_delay(probes.delay())
        .with_policy(probes.abandon)
}

/// Builds a fresh driver client per check.
#[derive(Debug, Clone)]
pub struct MongoClient {
    uri: String,
}

impl MongoClient {
    /// Accepts a `mongodb://` / `mongodb+srv://` URI or a bare `host[:port]`.
    pub fn new(address: &str) -> Self {
        let address = address.trim();
        let uri = if address.starts_with("mongodb://") || address.starts_with("mongodb+srv://") {
            address.to_string()
        } else {
            format!("mongodb://{}", address)
        };
        Self { uri }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

pub struct MongoSession {
    client: Client,
}

#[async_trait]
impl DependencyClient for MongoClient {
    type Session = MongoSession;

    async fn connect(&self) -> Result<MongoSession, String> {
        let mut options = ClientOptions::parse(self.uri.as_str())
            .await
            .map_err(|e| e.to_string())?;
        options.app_name = Some(APP_NAME.to_string());
        let client = Client::with_options(options).map_err(|e| e.to_string())?;
        Ok(MongoSession { client })
    }
}

#[async_trait]
impl DependencySession for MongoSession {
    async fn ping(&mut self) -> Result<(), SessionError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| match *e.kind {
                // The driver connects lazily, so an unreachable server shows up here.
                ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                    SessionError::Connection(e.to_string())
                }
                _ => SessionError::Command(e.to_string()),
            })
    }

    async fn close(self) {
        self.client.shutdown().await;
    }
}
