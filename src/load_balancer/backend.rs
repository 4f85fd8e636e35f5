//! HTTP backend.
//!
//! # Responsibilities
//! - Represent a single upstream server by its parsed base URI
//! - Expose an atomic liveness flag (written by the health monitor)
//! - Own the HTTP client that forwards requests to this upstream

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderValue, Request, Version},
    response::Response,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::{BackendConfig, TimeoutConfig};
use crate::config::validation::{parse_backend_url, ValidationError};
use crate::http::headers::{prepare_upstream_headers, strip_hop_by_hop};
use crate::http::request::{upstream_uri, url_authority};
use crate::load_balancer::Backend;

/// Failure of a single forward. Local to one request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("could not build upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),
}

/// HTTP/1.1 client that speaks plain HTTP or TLS depending on the URI scheme.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Build an [`UpstreamClient`] trusting the webpki root store.
pub fn upstream_client(connect_timeout: Duration) -> UpstreamClient {
    let mut http = HttpConnector::new();
    http.set_connect_timeout(Some(connect_timeout));
    http.enforce_http(false);

    let connector = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);
    Client::builder(TokioExecutor::new()).build(connector)
}

/// A backend reached over HTTP/1.1, with or without TLS.
#[derive(Debug)]
pub struct HttpBackend {
    /// Address as configured.
    address: String,
    /// Optional display name.
    name: Option<String>,
    /// Parsed base URL; requests are joined onto it.
    url: Url,
    /// `host[:port]` used to rewrite the `Host` header.
    authority: HeaderValue,
    /// Liveness flag. Starts alive.
    alive: AtomicBool,
    request_timeout: Duration,
    forwarder: UpstreamClient,
}

impl HttpBackend {
    /// Create a backend from configuration. Fails if the address does not parse.
    pub fn new(config: &BackendConfig, timeouts: &TimeoutConfig) -> Result<Self, ValidationError> {
        let url = parse_backend_url(&config.address)?;
        let authority = HeaderValue::from_str(&url_authority(&url)).map_err(|e| {
            ValidationError::InvalidBackendUri {
                address: config.address.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            address: config.address.clone(),
            name: config.name.clone(),
            url,
            authority,
            alive: AtomicBool::new(true),
            request_timeout: timeouts.request(),
            forwarder: upstream_client(timeouts.connect()),
        })
    }

    /// Name for logs: the configured name, or the address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Update liveness. Only the health monitor calls this.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }
}

impl Backend for HttpBackend {
    fn address(&self) -> &str {
        &self.address
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    async fn forward(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let client_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let (mut parts, body) = request.into_parts();
        prepare_upstream_headers(&mut parts.headers, &parts.uri, &self.authority, client_addr);
        parts.uri = upstream_uri(&self.url, &parts.uri)?;
        parts.version = Version::HTTP_11;

        let upstream = Request::from_parts(parts, body);
        let response = tokio::time::timeout(self.request_timeout, self.forwarder.request(upstream))
            .await
            .map_err(|_| ForwardError::Timeout(self.request_timeout))??;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
