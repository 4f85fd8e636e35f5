//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the backend pool from configuration
//! - Create the Axum router: every path and method goes to the dispatcher
//! - Wire up middleware (request ID, tracing)
//! - Serve the listener and spawn the health monitor

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::health::HealthMonitor;
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::Shutdown;
use crate::load_balancer::{Backend, BackendPool, Dispatcher, HttpBackend};

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    pool: Arc<BackendPool<HttpBackend>>,
}

impl HttpServer {
    /// Validate `config` and build the backend pool.
    ///
    /// Any malformed backend address or other invalid setting is fatal.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let members = config
            .backends
            .iter()
            .map(|backend| HttpBackend::new(backend, &config.timeouts))
            .collect::<Result<Vec<_>, _>>()?;
        let pool = Arc::new(BackendPool::new(members)?);

        for backend in pool.members() {
            tracing::info!(
                backend = backend.display_name(),
                address = backend.address(),
                "Backend registered"
            );
        }

        let router = router(Dispatcher::new(Arc::clone(&pool)));
        Ok(Self {
            router,
            config,
            pool,
        })
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "HTTP server starting"
        );

        if self.config.health_check.enabled {
            let monitor = HealthMonitor::new(
                Arc::clone(&self.pool),
                self.config.health_check.clone(),
            );
            tokio::spawn(monitor.run(shutdown.subscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        let mut stop = shutdown.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<BackendPool<HttpBackend>> {
        &self.pool
    }
}

/// Build the proxy router around `dispatcher`.
///
/// There are no routes: the fallback handler takes every request.
pub fn router<B: Backend>(dispatcher: Dispatcher<B>) -> Router {
    Router::new()
        .fallback(proxy_handler::<B>)
        .with_state(dispatcher)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

async fn proxy_handler<B: Backend>(
    State(dispatcher): State<Dispatcher<B>>,
    request: Request<Body>,
) -> Response {
    dispatcher.dispatch(request).await
}
