//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the [`Router`] as an axum application
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::router::Router;
use crate::lifecycle::Shutdown;
use crate::routing::RouteError;

/// HTTP server for a compiled [`Router`].
pub struct HttpServer {
    app: axum::Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a server for `router` with the listener and timeout settings of `config`.
    pub fn new(router: Router, config: RouterConfig) -> Self {
        let app = Self::build_app(router, &config);
        Self { app, config }
    }

    /// Create a server whose routes come from `config`.
    pub fn from_config(config: RouterConfig) -> Result<Self, RouteError> {
        let router = Router::from_config(&config)?;
        Ok(Self::new(router, config))
    }

    /// Build the axum application with all middleware layers.
    #[allow(deprecated)]
    fn build_app(router: Router, config: &RouterConfig) -> axum::Router {
        router
            .into_axum()
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The layered application, for in-process testing.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.notified().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
