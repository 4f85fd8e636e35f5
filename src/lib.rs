//! Round-robin HTTP reverse proxy.
//!
//! Every inbound request is forwarded to exactly one backend, chosen by a
//! lock-free rotation over a fixed, ordered pool. Backends that are not alive
//! are skipped; when none is alive the request is answered with a 503.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
