//! Responses synthesized by the proxy itself.
//!
//! Backend responses are relayed untouched apart from hop-by-hop header
//! stripping; the functions here cover the cases where no backend answered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::load_balancer::ForwardError;

/// 503: every backend failed the liveness check.
pub fn service_unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "No backend available").into_response()
}

/// 504 when the backend timed out, 502 for any other forwarding failure.
pub fn gateway_error(error: &ForwardError) -> Response {
    match error {
        ForwardError::Timeout(_) => {
            (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
        }
        ForwardError::Upstream(_) | ForwardError::InvalidRequest(_) => {
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn timeout_maps_to_504() {
        let response = gateway_error(&ForwardError::Timeout(Duration::from_secs(30)));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn no_backend_maps_to_503() {
        assert_eq!(service_unavailable().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
