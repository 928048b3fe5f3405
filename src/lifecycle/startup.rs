//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize subsystems in dependency order (metrics, routes)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when routes compiled)

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, RouterConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::routing::RouteError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route registration failed: {0}")]
    Routes(#[from] RouteError),

    #[error("metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the configuration at `path`, or the defaults when none is given.
pub fn load(path: Option<&Path>) -> Result<RouterConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(RouterConfig::default()),
    }
}

/// Start every subsystem for `config` and serve until `shutdown` fires.
pub async fn run(config: RouterConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    tracing::info!(
        bind_address = %bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = HttpServer::from_config(config)?;
    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    server.run(listener, shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_path() {
        let config = load(None).unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load(Some(Path::new("/no/such/router.toml"))).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Io(_))));
    }
}
