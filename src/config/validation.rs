//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//! - Compile every route pattern and parameter regex up front
//! - Detect routes declared twice, or differing only in parameter names, for the same method
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::http::router::{anchored, parse_methods};
use crate::routing::Pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("route {index}: {message}")]
    Route { index: usize, message: String },

    #[error("param '{name}': {message}")]
    Param { name: String, message: String },
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen: HashMap<(Method, String), String> = HashMap::new();
    for (index, route) in config.routes.iter().enumerate() {
        let route_error = |message: String| ValidationError::Route { index, message };

        let methods = match parse_methods(&route.methods) {
            Ok(methods) => methods,
            Err(e) => {
                errors.push(route_error(e.to_string()));
                continue;
            }
        };
        if methods.is_empty() {
            errors.push(route_error("no methods given".to_string()));
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(route_error(format!("invalid status {}", route.status)));
        }

        let pattern = match Pattern::parse(&route.pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                errors.push(route_error(e.to_string()));
                continue;
            }
        };
        for method in methods {
            match seen.get(&(method.clone(), pattern.shape())) {
                Some(existing) if existing == pattern.as_str() => {
                    errors.push(route_error(format!("{method} {pattern} is declared more than once")));
                }
                Some(existing) => {
                    errors.push(route_error(format!(
                        "{method} {pattern} conflicts with {existing}: they differ only in parameter names"
                    )));
                }
                None => {
                    seen.insert((method, pattern.shape()), pattern.as_str().to_string());
                }
            }
        }
    }

    let mut names = HashSet::new();
    for param in &config.params {
        let param_error = |message: String| ValidationError::Param {
            name: param.name.clone(),
            message,
        };
        if !names.insert(param.name.as_str()) {
            errors.push(param_error("declared more than once".to_string()));
        }
        if let Err(e) = anchored(&param.regex) {
            errors.push(param_error(e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
