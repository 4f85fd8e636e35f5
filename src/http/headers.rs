//! Proxy header rewriting.

use axum::http::{
    header::{CONNECTION, HOST},
    HeaderMap, HeaderName, HeaderValue, Uri,
};
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Headers that only describe one transport hop.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Rewrite inbound headers for the upstream hop.
///
/// Strips hop-by-hop headers, records the original host and caller in the
/// `X-Forwarded-*` family and points `Host` at the backend. HTTP/2 callers
/// send no `Host`, so the inbound URI authority stands in for it.
pub fn prepare_upstream_headers(
    headers: &mut HeaderMap,
    inbound: &Uri,
    authority: &HeaderValue,
    client_addr: Option<SocketAddr>,
) {
    strip_hop_by_hop(headers);

    if !headers.contains_key(X_FORWARDED_HOST) {
        let host = headers.get(HOST).cloned().or_else(|| {
            inbound
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
        });
        if let Some(host) = host {
            headers.insert(X_FORWARDED_HOST, host);
        }
    }

    if let Some(addr) = client_addr {
        let ip = addr.ip().to_string();
        let prior: Vec<&str> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        let chain = if prior.is_empty() {
            ip
        } else {
            format!("{}, {ip}", prior.join(", "))
        };
        if let Ok(value) = HeaderValue::from_str(&chain) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    headers.insert(HOST, authority.clone());
}
