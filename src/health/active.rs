//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every pool member
//! - Drive each member's liveness flag through its `HealthState`

use axum::body::Body;
use axum::http::{header::USER_AGENT, Request, Uri};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::HealthState;
use crate::http::request::upstream_uri;
use crate::load_balancer::backend::{upstream_client, UpstreamClient};
use crate::load_balancer::{Backend, BackendPool, HttpBackend};
use crate::observability::metrics;

const USER_AGENT_VALUE: &str = "round-robin-proxy-health-check";

pub struct HealthMonitor {
    pool: Arc<BackendPool<HttpBackend>>,
    config: HealthCheckConfig,
    states: Vec<HealthState>,
    client: UpstreamClient,
}

impl HealthMonitor {
    pub fn new(pool: Arc<BackendPool<HttpBackend>>, config: HealthCheckConfig) -> Self {
        let states = pool
            .members()
            .iter()
            .map(|_| HealthState::new(config.unhealthy_threshold, config.healthy_threshold))
            .collect();

        Self {
            client: upstream_client(config.timeout()),
            pool,
            config,
            states,
        }
    }

    /// Probe on every tick until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Active health checks disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            path = %self.config.path,
            backends = self.pool.len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.check_all().await,
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every member concurrently, then apply any state transitions.
    ///
    /// A tick takes at most one probe timeout however many members hang.
    pub async fn check_all(&mut self) {
        let pool = Arc::clone(&self.pool);
        let members = pool.members();

        let results = join_all(
            members
                .iter()
                .map(|backend| probe(&self.client, backend, &self.config)),
        )
        .await;

        for ((backend, state), healthy) in members.iter().zip(self.states.iter_mut()).zip(results) {
            if let Some(alive) = state.record(healthy) {
                backend.set_alive(alive);
                if alive {
                    tracing::info!(backend = backend.display_name(), "Backend is alive again");
                } else {
                    tracing::warn!(backend = backend.display_name(), "Backend marked down");
                }
            }

            metrics::record_backend_health(backend.address(), backend.is_alive());
        }
    }
}

/// One `GET` against the backend's health path. 2xx and 3xx count as healthy.
async fn probe(
    client: &UpstreamClient,
    backend: &HttpBackend,
    config: &HealthCheckConfig,
) -> bool {
    let addr = backend.address();

    let request = config
        .path
        .parse::<Uri>()
        .map_err(axum::http::Error::from)
        .and_then(|path| upstream_uri(backend.url(), &path))
        .and_then(|uri| {
            Request::get(uri)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .body(Body::empty())
        });
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(addr, error = %e, "Failed to build health check request");
            return false;
        }
    };

    match time::timeout(config.timeout(), client.request(request)).await {
        Ok(Ok(response)) => {
            let status = response.status();
            let healthy = status.is_success() || status.is_redirection();
            if !healthy {
                tracing::warn!(addr, status = %status, "Health check failed: unexpected status");
            }
            healthy
        }
        Ok(Err(e)) => {
            tracing::warn!(addr, error = %e, "Health check failed: connection error");
            false
        }
        Err(_) => {
            tracing::warn!(addr, "Health check failed: timeout");
            false
        }
    }
}
