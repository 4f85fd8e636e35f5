//! Request dispatch.
//!
//! Glue between the HTTP layer and the pool: pick a backend, forward, and
//! turn every per-request failure into exactly one response.

use axum::{body::Body, http::Request, response::Response};
use std::sync::Arc;
use std::time::Instant;

use crate::http::response;
use crate::load_balancer::{Backend, BackendPool};
use crate::observability::metrics;

/// Stateless front door to a [`BackendPool`]. Cheap to clone.
#[derive(Debug)]
pub struct Dispatcher<B> {
    pool: Arc<BackendPool<B>>,
}

impl<B> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(pool: Arc<BackendPool<B>>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<BackendPool<B>> {
        &self.pool
    }

    /// Forward `request` to the next alive backend.
    ///
    /// Never retries: a forwarding failure becomes a 502/504 and an exhausted
    /// pool becomes a 503.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start = Instant::now();

        let backend = match self.pool.next() {
            Ok(backend) => backend,
            Err(e) => {
                tracing::warn!(
                    method = %request.method(),
                    uri = %request.uri(),
                    error = %e,
                    "Rejecting request"
                );
                metrics::record_no_backend();
                return response::service_unavailable();
            }
        };

        tracing::info!(
            backend = backend.address(),
            method = %request.method(),
            uri = %request.uri(),
            "Forwarding request"
        );

        let response = match backend.forward(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(backend = backend.address(), error = %e, "Upstream error");
                response::gateway_error(&e)
            }
        };

        metrics::record_request(backend.address(), response.status().as_u16(), start);
        response
    }
}
