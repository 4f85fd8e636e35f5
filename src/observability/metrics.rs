//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by backend, status
//! - `proxy_request_duration_seconds` (histogram): latency by backend
//! - `proxy_no_backend_total` (counter): requests rejected with 503
//! - `proxy_backend_up` (gauge): 1=alive, 0=not alive
//!
//! The macros are no-ops until a recorder is installed, so recording is safe
//! whether or not the exporter is enabled.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one forwarded request and its latency.
pub fn record_request(backend: &str, status: u16, start: Instant) {
    let backend = backend.to_string();
    counter!(
        "proxy_requests_total",
        "backend" => backend.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "backend" => backend)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_no_backend() {
    counter!("proxy_no_backend_total").increment(1);
}

pub fn record_backend_health(backend: &str, alive: bool) {
    gauge!("proxy_backend_up", "backend" => backend.to_string())
        .set(if alive { 1.0 } else { 0.0 });
}
