//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → dispatcher.rs (Dispatcher::dispatch)
//!     → pool.rs (BackendPool::next: atomic cursor + liveness filter)
//!     → backend.rs (HttpBackend::forward over its own client)
//!     → upstream response, or a synthesized 502/503/504
//! ```
//!
//! # Notes
//! - Pool membership is fixed at startup; only the cursor changes at runtime.
//! - Liveness is read through `Backend::is_alive`; the health monitor is the
//!   only writer.
//! - A failed forward never touches the pool and is never retried.

use axum::{body::Body, http::Request, response::Response};
use std::future::Future;

pub mod backend;
pub mod dispatcher;
pub mod pool;

pub use backend::{ForwardError, HttpBackend};
pub use dispatcher::Dispatcher;
pub use pool::{BackendPool, EmptyPool, NoBackendAvailable};

/// Something that can take proxied traffic.
///
/// One implementation exists per transport kind; the pool and dispatcher are
/// generic over it.
pub trait Backend: Send + Sync + 'static {
    /// The configured upstream address.
    fn address(&self) -> &str;

    /// Whether the backend is currently eligible for traffic.
    fn is_alive(&self) -> bool;

    /// Send `request` upstream and return whatever the backend produced.
    fn forward(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response, ForwardError>> + Send;
}
