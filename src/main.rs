//! Liveness probe service.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /healthcheck/            GET /parallel-healthcheck/
//!              │                              │
//!              ▼                              ▼
//!     ┌──────────────────────────────────────────────┐
//!     │ http (axum router, request id, trace)        │
//!     └──────────────────────┬───────────────────────┘
//!                            ▼
//!     ┌──────────────────────────────────────────────┐
//!     │ health::HealthService                        │
//!     │   SerialRunner        ParallelRunner         │
//!     └──────────────────────┬───────────────────────┘
//!                            ▼
//!     ┌──────────────────────────────────────────────┐
//!     │ Probe (KeyValue, DocumentStore)              │
//!     │   └─ resilience::TimeoutGuard                │
//!     └──────────────────────┬───────────────────────┘
//!                            ▼
//!                    Redis      MongoDB
//! ```

use std::path::PathBuf;
use tokio::net::TcpListener;

use liveness_probe::config::{load_config, ObservabilityConfig};
use liveness_probe::observability::{logging, metrics};
use liveness_probe::lifecycle::{signals, Shutdown};
use liveness_probe::HttpServer;

/// Environment variable naming the config file when no argument is given.
const CONFIG_PATH_ENV: &str = "LIVENESS_PROBE_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, path = ?config_path, "Could not load configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("liveness-probe v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        delay_secs = config.probes.delay_secs,
        abandon = ?config.probes.abandon,
        unhealthy_status = config.http.unhealthy_status,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %config.listener.bind_address, "Could not initialize server");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
