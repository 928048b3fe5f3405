//! Per-request state carried through a handler chain.

use axum::body::Body;
use axum::http::{Extensions, HeaderMap, Method, Request, Uri};

use crate::routing::Params;

/// The request being dispatched, its captured parameters and the pattern it matched.
///
/// One context exists per request; it moves from handler to handler through
/// [`Next::run`](crate::dispatch::Next::run) and is never shared.
#[derive(Debug)]
pub struct RequestContext {
    request: Request<Body>,
    params: Params,
    route: Option<String>,
}

impl RequestContext {
    pub fn new(request: Request<Body>) -> Self {
        Self {
            request,
            params: Params::new(),
            route: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Record the pattern the request was resolved against.
    pub fn with_route(mut self, pattern: impl Into<String>) -> Self {
        self.route = Some(pattern.into());
        self
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// A captured path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The matched route pattern, e.g. `/users/:id`.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Typed values handed from one handler to the next.
    pub fn extensions(&self) -> &Extensions {
        self.request.extensions()
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.request.extensions_mut()
    }

    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.request
    }

    pub fn into_request(self) -> Request<Body> {
        self.request
    }
}
