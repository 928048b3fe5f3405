//! Radix-tree HTTP router service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (tower-http layers)
//!                         │
//!                         ▼
//!                     http::router ──▶ routing::table ──▶ routing::tree
//!                         │            (per method)       (radix match)
//!                         ▼
//!                     dispatch::chain (validators, then handlers)
//!                         │
//!     Client Response     ▼
//!     ◀────────────── http::responder
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use radix_router::lifecycle::{signals, startup, Shutdown};
use radix_router::observability::logging;

#[derive(Parser)]
#[command(name = "radix-router")]
#[command(about = "Serve configured routes from a radix-tree router", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!("radix-router v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
