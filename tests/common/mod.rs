//! Shared utilities for integration tests.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use liveness_probe::config::ProbeConfig;
use liveness_probe::health::{
    DependencyClient, DependencyProbe, DependencySession, HealthService, ParallelRunner, Probe, SessionError,
};
use liveness_probe::lifecycle::Shutdown;
use liveness_probe::HttpServer;

/// Connection bookkeeping shared between a mock client and its sessions.
#[derive(Default)]
pub struct Counters {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    pub open: AtomicUsize,
}

#[allow(dead_code)]
impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

/// Behaviour of a mock dependency.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub enum Behaviour {
    #[default]
    Healthy,
    RefuseConnection(&'static str),
    FailPing(&'static str),
}

/// A dependency client that never touches the network.
#[derive(Clone, Default)]
pub struct MockClient {
    pub counters: Arc<Counters>,
    pub behaviour: Behaviour,
}

pub struct MockSession {
    counters: Arc<Counters>,
    behaviour: Behaviour,
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DependencyClient for MockClient {
    type Session = MockSession;

    async fn connect(&self) -> Result<MockSession, String> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        if let Behaviour::RefuseConnection(reason) = self.behaviour {
            return Err(reason.to_string());
        }
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            counters: self.counters.clone(),
            behaviour: self.behaviour.clone(),
        })
    }
}

#[async_trait]
impl DependencySession for MockSession {
    async fn ping(&mut self) -> Result<(), SessionError> {
        match self.behaviour {
            Behaviour::FailPing(reason) => Err(SessionError::Command(reason.to_string())),
            _ => Ok(()),
        }
    }

    async fn close(self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a mock-backed probe and hand back its counters.
pub fn mock_probe(
    name: &str,
    behaviour: Behaviour,
    delay: Duration,
    timeout: Duration,
) -> (Arc<dyn Probe>, Arc<Counters>) {
    let client = MockClient {
        behaviour,
        ..Default::default()
    };
    let counters = client.counters.clone();
    let probe: Arc<dyn Probe> = Arc::new(DependencyProbe::new(name, client, timeout).with_delay(delay));
    (probe, counters)
}

/// Boot the HTTP server on an ephemeral port around the given probes.
#[allow(dead_code)]
pub async fn start_server(mut config: ProbeConfig, probes: Vec<Arc<dyn Probe>>) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let health = HealthService::new(probes, ParallelRunner::new(config.probes.abandon));
    let server = HttpServer::with_health(config, health);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
