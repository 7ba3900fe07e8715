//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the two health check endpoints
//! - Wire up middleware (tracing, request ID, request timeout)
//! - Bind server to listener
//! - Stop on the shutdown signal

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProbeConfig;
use crate::health::{CheckMode, HealthService};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::verdict_response;

pub const SERIAL_PATH: &str = "/healthcheck";
pub const PARALLEL_PATH: &str = "/parallel-healthcheck";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub health: HealthService,
    pub unhealthy_status: StatusCode,
}

/// HTTP server for the liveness probe.
pub struct HttpServer {
    router: Router,
    probe_names: Vec<String>,
}

impl HttpServer {
    /// Create a new HTTP server probing the configured dependencies.
    pub fn new(config: ProbeConfig) -> Self {
        let health = HealthService::from_config(&config.probes);
        Self::with_health(config, health)
    }

    /// Create a server around an existing probe set.
    pub fn with_health(config: ProbeConfig, health: HealthService) -> Self {
        let unhealthy_status = StatusCode::from_u16(config.http.unhealthy_status).unwrap_or_else(|_| {
            tracing::warn!(
                status = config.http.unhealthy_status,
                "Invalid unhealthy status code, falling back to 200"
            );
            StatusCode::OK
        });

        let probe_names = health.probes().iter().map(|p| p.name().to_string()).collect();
        let state = AppState {
            health,
            unhealthy_status,
        };
        let router = Self::build_router(&config, state);
        Self { router, probe_names }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProbeConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id(request.headers()),
            )
        });

        Router::new()
            .route(SERIAL_PATH, get(serial_healthcheck))
            .route("/healthcheck/", get(serial_healthcheck))
            .route("/healthcheck/{*rest}", get(serial_healthcheck))
            .route(PARALLEL_PATH, get(parallel_healthcheck))
            .route("/parallel-healthcheck/", get(parallel_healthcheck))
            .route("/parallel-healthcheck/{*rest}", get(parallel_healthcheck))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(trace)
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            probes = %self.probe_names.join(","),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn serial_healthcheck(State(state): State<AppState>) -> Response {
    let verdict = state.health.check(CheckMode::Serial).await;
    verdict_response(&verdict, state.unhealthy_status)
}

async fn parallel_healthcheck(State(state): State<AppState>) -> Response {
    let verdict = state.health.check(CheckMode::Parallel).await;
    verdict_response(&verdict, state.unhealthy_status)
}
