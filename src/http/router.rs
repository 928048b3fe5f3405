//! Application-facing router.
//!
//! # Responsibilities
//! - Register handlers per HTTP method and parameter validators
//! - Resolve each request and run its handler chain
//! - Apply method policy: HEAD falls back to GET, OPTIONS is answered
//!   automatically, other method mismatches get 405
//! - Record metrics and log failures
//!
//! # Design Decisions
//! - Tree matching runs on the raw path; captures are percent-decoded afterwards,
//!   so an encoded `/` never creates a segment
//! - Regex validators are anchored and reject with 400
//! - The router plugs into axum as a fallback service

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::config::RouterConfig;
use crate::dispatch::{BoxedHandler, Dispatcher, Failure, Handler, Next, Outcome, RequestContext};
use crate::http::responder::Responder;
use crate::observability::metrics;
use crate::routing::{RouteError, RouteTable};

/// Methods `all` registers under, in `Allow` header order.
pub const STANDARD_METHODS: [Method; 9] = [
    Method::CONNECT,
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::TRACE,
];

/// Parse method names from configuration; `"*"` expands to every standard method.
pub fn parse_methods(names: &[String]) -> Result<Vec<Method>, RouteError> {
    let mut methods = Vec::new();
    for name in names {
        let name = name.trim();
        if name == "*" {
            methods.extend(STANDARD_METHODS.iter().cloned());
            continue;
        }
        let method = Method::from_bytes(name.to_ascii_uppercase().as_bytes())
            .map_err(|_| RouteError::InvalidMethod(name.to_string()))?;
        methods.push(method);
    }
    Ok(methods)
}

/// Compile `regex` so it must match a whole captured value.
pub fn anchored(regex: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{regex})$"))
}

/// Routes requests to handler chains.
///
/// ```ignore
/// let mut router = Router::new();
/// router
///     .param_regex("id", "[0-9]+")?
///     .get("/users/:id", |cx: RequestContext, _next: Next| async move {
///         respond(format!("user {}", cx.param("id").unwrap_or_default()))
///     })?;
/// ```
#[derive(Clone, Default)]
pub struct Router {
    table: RouteTable<BoxedHandler>,
}

macro_rules! method_helpers {
    ($($(#[$doc:meta])* $name:ident => $method:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
                self.route(Method::$method, pattern, handler)
            }
        )*
    };
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    pub fn route<H: Handler>(&mut self, method: Method, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.table.register(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    method_helpers! {
        get => GET,
        post => POST,
        put => PUT,
        delete => DELETE,
        patch => PATCH,
        /// Explicit HEAD routes take precedence over the GET fallback.
        head => HEAD,
        /// Explicit OPTIONS routes replace the automatic answer.
        options => OPTIONS,
        trace => TRACE,
        connect => CONNECT,
    }

    /// Register one handler under every standard method.
    pub fn all<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        let handler: BoxedHandler = Arc::new(handler);
        for method in STANDARD_METHODS {
            self.table.register(method, pattern, handler.clone())?;
        }
        Ok(self)
    }

    /// Run `validator` before every route declaring parameter `name`.
    pub fn param<H: Handler>(&mut self, name: &str, validator: H) -> Result<&mut Self, RouteError> {
        self.table.register_param_validator(name, Arc::new(validator))?;
        Ok(self)
    }

    /// Reject with 400 any request whose `name` capture does not fully match `regex`.
    pub fn param_regex(&mut self, name: &str, regex: &str) -> Result<&mut Self, RouteError> {
        let compiled = anchored(regex).map_err(|source| RouteError::InvalidValidator {
            name: name.to_string(),
            source,
        })?;
        let param = name.to_string();

        self.param(name, move |cx: RequestContext, next: Next| {
            let rejected = cx
                .param(&param)
                .filter(|value| !compiled.is_match(value))
                .map(|value| format!("invalid value '{value}' for parameter '{param}'"));
            async move {
                match rejected {
                    Some(message) => Err(Failure::bad_request(message)),
                    None => next.run(cx).await,
                }
            }
        })
    }

    /// Build a router serving the `[[routes]]` and `[[params]]` of `config`.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouteError> {
        let mut router = Self::new();

        for param in &config.params {
            router.param_regex(&param.name, &param.regex)?;
        }
        for route in &config.routes {
            let responder: BoxedHandler = Arc::new(Responder::from_config(route));
            for method in parse_methods(&route.methods)? {
                router.table.register(method, &route.pattern, responder.clone())?;
            }
        }

        tracing::info!(
            routes = router.table.len(),
            validators = config.params.len(),
            "Routes compiled"
        );
        Ok(router)
    }

    pub fn table(&self) -> &RouteTable<BoxedHandler> {
        &self.table
    }

    /// Methods `path` answers to, as listed in an `Allow` header.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed = self.table.allowed_methods(path);
        if allowed.contains(&Method::GET) && !allowed.contains(&Method::HEAD) {
            allowed.push(Method::HEAD);
            allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        }
        allowed
    }

    /// Dispatch one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let resolved = self.table.resolve(&method, &path).or_else(|| {
            if method == Method::HEAD {
                self.table.resolve(&Method::GET, &path)
            } else {
                None
            }
        });

        let Some(resolved) = resolved else {
            let response = self.unmatched(&method, &path);
            metrics::record_request(method.as_str(), metrics::UNMATCHED, response.status().as_u16(), start);
            return response;
        };

        let pattern = resolved.route.pattern().as_str().to_string();
        let chain = resolved.chain().clone();
        let mut params = resolved.params;
        params.map_values(|value| percent_decode_str(value).decode_utf8_lossy().into_owned());

        let cx = RequestContext::new(request)
            .with_params(params)
            .with_route(pattern.clone());

        let response = match Dispatcher::new(chain).run(cx).await {
            Outcome::Completed(response) => response,
            Outcome::Failed(failure) => {
                let status = failure.status_code();
                if status.is_server_error() {
                    tracing::error!(method = %method, path = %path, route = %pattern, error = %failure, "Handler failed");
                } else {
                    tracing::warn!(method = %method, path = %path, route = %pattern, status = %status, "Request rejected");
                }
                failure.into_response()
            }
            Outcome::Unhandled(_) => {
                tracing::debug!(method = %method, path = %path, route = %pattern, "Handler chain exhausted");
                not_found()
            }
        };

        metrics::record_request(method.as_str(), &pattern, response.status().as_u16(), start);
        response
    }

    fn unmatched(&self, method: &Method, path: &str) -> Response {
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return not_found();
        }

        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let status = if *method == Method::OPTIONS {
            StatusCode::OK
        } else {
            tracing::debug!(method = %method, path = %path, allow = %allow, "Method not allowed");
            StatusCode::METHOD_NOT_ALLOWED
        };

        match HeaderValue::from_str(&allow) {
            Ok(value) => (status, [(header::ALLOW, value)], allow).into_response(),
            Err(_) => (status, allow).into_response(),
        }
    }

    /// Wrap the router as an axum application.
    pub fn into_axum(self) -> axum::Router {
        let router = Arc::new(self);
        axum::Router::new().fallback(move |request: Request<Body>| {
            let router = router.clone();
            async move { router.handle(request).await }
        })
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
