//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::load_balancer::pool::EmptyPool;

/// Error type for configuration loading. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    EmptyPool(#[from] EmptyPool),
}

impl From<ValidationError> for ConfigError {
    fn from(error: ValidationError) -> Self {
        ConfigError::Validation(vec![error])
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration text without validating it.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a TOML file without validating it, so callers can apply overrides first.
pub fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;

    const SAMPLE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:8000"

        [[backends]]
        address = "http://127.0.0.1:9001"
        name = "app-1"

        [[backends]]
        address = "http://127.0.0.1:9002"

        [timeouts]
        request_secs = 10
    "#;

    #[test]
    fn parses_backends_in_order() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8000");
        assert_eq!(
            config.backends,
            vec![
                BackendConfig {
                    address: "http://127.0.0.1:9001".into(),
                    name: Some("app-1".into()),
                },
                BackendConfig::new("http://127.0.0.1:9002"),
            ]
        );
        assert_eq!(config.timeouts.request_secs, 10);
        // Untouched sections keep their defaults.
        assert_eq!(config.timeouts.connect_secs, 5);
        assert!(!config.health_check.enabled);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("[[backends]\naddress = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_validation_errors() {
        let path = std::env::temp_dir().join(format!(
            "round-robin-proxy-invalid-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[[backends]]\naddress = \"not a uri\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/round-robin-proxy.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
