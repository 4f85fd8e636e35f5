//! Round-robin reverse proxy binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ listener ──▶ http::server (request id, trace)
//!                                   │
//!                                   ▼
//!                        load_balancer::Dispatcher
//!                                   │
//!                                   ▼
//!                 BackendPool::next (atomic cursor, skip dead)
//!                                   │
//!                                   ▼
//!                 HttpBackend::forward ──────────────▶ Backend server
//!
//!     health::HealthMonitor ── set_alive ──▶ HttpBackend
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use round_robin_proxy::config::{read_config, validate_config, BackendConfig, ProxyConfig};
use round_robin_proxy::lifecycle::{wait_for_signal, Shutdown};
use round_robin_proxy::observability::{init_logging, init_metrics};
use round_robin_proxy::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "round-robin-proxy")]
#[command(about = "Round-robin HTTP reverse proxy", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `listener.bind_address`
    #[arg(short, long)]
    listen: Option<String>,

    /// Backend URI; repeat for more. Replaces the configured backend list.
    #[arg(short, long = "backend", value_name = "URI")]
    backends: Vec<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut ProxyConfig) {
        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if !self.backends.is_empty() {
            config.backends = self.backends.into_iter().map(BackendConfig::new).collect();
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    init_logging(&config.observability.log_level)?;
    tracing::info!("round-robin-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "Invalid configuration");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        request_timeout_secs = config.timeouts.request_secs,
        health_checks = config.health_check.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_flags_replace_configured_backends() {
        let cli = Cli::parse_from([
            "round-robin-proxy",
            "--backend",
            "http://127.0.0.1:9001",
            "-b",
            "http://127.0.0.1:9002",
            "--listen",
            "127.0.0.1:8080",
        ]);
        let mut config = ProxyConfig {
            backends: vec![BackendConfig::new("http://old:1")],
            ..ProxyConfig::default()
        };

        cli.apply(&mut config);

        let addresses: Vec<_> = config.backends.iter().map(|b| b.address.as_str()).collect();
        assert_eq!(addresses, ["http://127.0.0.1:9001", "http://127.0.0.1:9002"]);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn no_flags_keep_the_file_values() {
        let cli = Cli::parse_from(["round-robin-proxy", "--log-level", "debug"]);
        let mut config = ProxyConfig {
            backends: vec![BackendConfig::new("http://kept:1")],
            ..ProxyConfig::default()
        };

        cli.apply(&mut config);

        assert_eq!(config.backends, [BackendConfig::new("http://kept:1")]);
        assert_eq!(config.observability.log_level, "debug");
    }
}
