use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::json;

use radix_router::config::load_config;
use radix_router::http::Router;
use radix_router::observability::logging;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect a radix-router route configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and compile every route
    Check,
    /// Show which route a request would reach
    Resolve {
        method: String,
        path: String,
    },
    /// Print the routing tree of one method, or of all of them
    Tree {
        method: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init(&config.observability);
    let router = Router::from_config(&config)?;

    match cli.command {
        Commands::Check => {
            println!(
                "OK: {} routes, {} parameter validators",
                router.table().len(),
                config.params.len()
            );
        }
        Commands::Resolve { method, path } => {
            let method = parse_method(&method)?;
            let resolved = router.table().resolve(&method, &path).or_else(|| {
                if method == Method::HEAD {
                    router.table().resolve(&Method::GET, &path)
                } else {
                    None
                }
            });

            let output = match resolved {
                Some(resolved) => json!({
                    "matched": true,
                    "method": resolved.route.method().as_str(),
                    "pattern": resolved.route.pattern().as_str(),
                    "params": resolved.params,
                    "chain": resolved.chain().len(),
                }),
                None => json!({
                    "matched": false,
                    "allowed": router
                        .allowed_methods(&path)
                        .iter()
                        .map(Method::as_str)
                        .collect::<Vec<_>>(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Tree { method } => {
            let methods = match method {
                Some(name) => vec![parse_method(&name)?],
                None => radix_router::http::STANDARD_METHODS.to_vec(),
            };
            for method in methods {
                if let Some(tree) = router.table().tree(&method) {
                    println!("{method} ({} routes)", tree.len());
                    print!("{tree}");
                }
            }
        }
    }

    Ok(())
}

fn parse_method(name: &str) -> Result<Method, Box<dyn std::error::Error>> {
    Ok(Method::from_bytes(name.to_ascii_uppercase().as_bytes())?)
}
