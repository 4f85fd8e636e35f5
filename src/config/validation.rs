//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse every backend URI exactly the way the pool will
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! Returns every error found, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// Upstream schemes the forwarder speaks.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one backend must be configured")]
    NoBackends,

    #[error("backend `{address}` is not a valid URI: {reason}")]
    InvalidBackendUri { address: String, reason: String },

    #[error("backend `{address}` uses unsupported scheme `{scheme}` (expected `http` or `https`)")]
    UnsupportedScheme { address: String, scheme: String },

    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("`{0}` must be greater than zero")]
    MustBePositive(&'static str),

    #[error("health check path `{0}` must start with `/`")]
    InvalidHealthPath(String),
}

/// Parse a configured backend address into its upstream base URL.
pub fn parse_backend_url(address: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(address).map_err(|e| ValidationError::InvalidBackendUri {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(ValidationError::UnsupportedScheme {
            address: address.to_string(),
            scheme: url.scheme().to_string(),
        });
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidBackendUri {
            address: address.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Validate a configuration. Pure: `&ProxyConfig → Result<(), Vec<ValidationError>>`.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }
    for backend in &config.backends {
        if let Err(e) = parse_backend_url(&backend.address) {
            errors.push(e);
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::MustBePositive("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::MustBePositive("timeouts.request_secs"));
    }

    let health = &config.health_check;
    if health.enabled {
        if health.interval_secs == 0 {
            errors.push(ValidationError::MustBePositive("health_check.interval_secs"));
        }
        if health.timeout_secs == 0 {
            errors.push(ValidationError::MustBePositive("health_check.timeout_secs"));
        }
        if health.unhealthy_threshold == 0 {
            errors.push(ValidationError::MustBePositive("health_check.unhealthy_threshold"));
        }
        if health.healthy_threshold == 0 {
            errors.push(ValidationError::MustBePositive("health_check.healthy_threshold"));
        }
        if !health.path.starts_with('/') {
            errors.push(ValidationError::InvalidHealthPath(health.path.clone()));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;

    fn config_with(backends: &[&str]) -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.backends = backends.iter().map(|a| BackendConfig::new(*a)).collect();
        config
    }

    #[test]
    fn accepts_minimal_config() {
        let config = config_with(&["http://127.0.0.1:9001", "http://backend.internal/api"]);
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn rejects_empty_backend_list() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoBackends]);
    }

    #[test]
    fn rejects_malformed_backend_uri() {
        let err = parse_backend_url("not a uri").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBackendUri { .. }));
    }

    #[test]
    fn accepts_https_backends() {
        for address in [
            "https://www.facebook.com",
            "https://www.bing.com",
            "https://www.duckduckgo.com",
        ] {
            let url = parse_backend_url(address).unwrap();
            assert_eq!(url.scheme(), "https");
        }
    }

    #[test]
    fn rejects_other_schemes() {
        let err = parse_backend_url("ftp://files.local").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedScheme {
                address: "ftp://files.local".into(),
                scheme: "ftp".into(),
            }
        );
    }

    #[test]
    fn collects_every_error() {
        let mut config = config_with(&["ftp://files.local", "::::"]);
        config.listener.bind_address = "localhost".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::InvalidBindAddress("localhost".into())));
        assert!(errors.contains(&ValidationError::MustBePositive("timeouts.request_secs")));
    }

    #[test]
    fn health_settings_only_checked_when_enabled() {
        let mut config = config_with(&["http://127.0.0.1:9001"]);
        config.health_check.path = "health".into();
        config.health_check.interval_secs = 0;
        assert!(validate_config(&config).is_ok());

        config.health_check.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidHealthPath("health".into())));
        assert!(errors.contains(&ValidationError::MustBePositive("health_check.interval_secs")));
    }
}
