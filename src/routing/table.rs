//! Per-verb route table.
//!
//! # Responsibilities
//! - Keep one [`Tree`] per HTTP method
//! - Compile patterns and reject invalid or duplicate registrations
//! - Extend an existing route's handler list on re-registration
//! - Splice parameter validators in front of every route declaring the parameter
//!
//! # Design Decisions
//! - Trees store an index into the method's route list, not the handlers themselves
//! - Each route caches its full chain (validators, then handlers) as an `Arc<[H]>`,
//!   so resolving a request never allocates a handler list
//! - Validators apply in registration order, whether registered before or after the route

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::routing::params::Params;
use crate::routing::pattern::{Pattern, PatternError};
use crate::routing::tree::{Tree, TreeError};

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("route '{pattern}' conflicts with '{existing}': they differ only in parameter names")]
    Conflict { pattern: String, existing: String },

    #[error("there is already a validator for parameter '{0}'")]
    DuplicateValidator(String),

    #[error("invalid validator for parameter '{name}': {source}")]
    InvalidValidator {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
}

/// A registered (method, pattern) pair and its handler chain.
#[derive(Debug, Clone)]
pub struct Route<H> {
    method: Method,
    pattern: Pattern,
    validators: Vec<H>,
    handlers: Vec<H>,
    chain: Arc<[H]>,
}

impl<H: Clone> Route<H> {
    fn new(method: Method, pattern: Pattern) -> Self {
        Self {
            method,
            pattern,
            validators: Vec::new(),
            handlers: Vec::new(),
            chain: Arc::from(Vec::new()),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Validators spliced in from the parameter registry.
    pub fn validators(&self) -> &[H] {
        &self.validators
    }

    /// Handlers registered for this route, in registration order.
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    /// Validators followed by handlers: what a request runs through.
    pub fn chain(&self) -> &Arc<[H]> {
        &self.chain
    }

    fn rebuild(&mut self) {
        self.chain = self
            .validators
            .iter()
            .chain(self.handlers.iter())
            .cloned()
            .collect();
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct Resolved<'a, H> {
    pub route: &'a Route<H>,
    pub params: Params,
}

impl<H: Clone> Resolved<'_, H> {
    pub fn chain(&self) -> &Arc<[H]> {
        self.route.chain()
    }
}

#[derive(Debug, Clone)]
struct MethodRoutes<H> {
    tree: Tree<usize>,
    routes: Vec<Route<H>>,
    by_pattern: HashMap<String, usize>,
    by_shape: HashMap<String, String>,
}

impl<H> MethodRoutes<H> {
    fn new() -> Self {
        Self {
            tree: Tree::new(),
            routes: Vec::new(),
            by_pattern: HashMap::new(),
            by_shape: HashMap::new(),
        }
    }
}

/// Routes for every HTTP method, plus the parameter validator registry.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    methods: HashMap<Method, MethodRoutes<H>>,
    validators: Vec<(String, H)>,
}

impl<H: Clone> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> RouteTable<H> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
            validators: Vec::new(),
        }
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering the same normalized pattern again for the same method
    /// appends to that route's handler list.
    pub fn register(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouteError> {
        let pattern = Pattern::parse(pattern)?;
        let routes = self
            .methods
            .entry(method.clone())
            .or_insert_with(MethodRoutes::new);

        if let Some(&index) = routes.by_pattern.get(pattern.as_str()) {
            let route = &mut routes.routes[index];
            route.handlers.push(handler);
            route.rebuild();
            tracing::debug!(
                method = %method,
                pattern = %pattern,
                handlers = route.handlers.len(),
                "Route extended"
            );
            return Ok(());
        }

        let shape = pattern.shape();
        if let Some(existing) = routes.by_shape.get(&shape) {
            return Err(RouteError::Conflict {
                pattern: pattern.as_str().to_string(),
                existing: existing.clone(),
            });
        }

        let index = routes.routes.len();
        routes.tree.add(pattern.as_str(), index)?;
        routes.by_shape.insert(shape, pattern.as_str().to_string());

        let mut route = Route::new(method.clone(), pattern);
        for (name, validator) in &self.validators {
            if route.pattern.declares(name) {
                route.validators.push(validator.clone());
            }
        }
        route.handlers.push(handler);
        route.rebuild();

        tracing::debug!(
            method = %method,
            pattern = %route.pattern,
            validators = route.validators.len(),
            "Route registered"
        );

        routes
            .by_pattern
            .insert(route.pattern.as_str().to_string(), index);
        routes.routes.push(route);
        Ok(())
    }

    /// Register a validator for every route declaring parameter `name`.
    pub fn register_param_validator(&mut self, name: &str, validator: H) -> Result<(), RouteError> {
        if self.validators.iter().any(|(existing, _)| existing == name) {
            return Err(RouteError::DuplicateValidator(name.to_string()));
        }

        let mut spliced = 0;
        for routes in self.methods.values_mut() {
            for route in routes.routes.iter_mut().filter(|r| r.pattern.declares(name)) {
                route.validators.push(validator.clone());
                route.rebuild();
                spliced += 1;
            }
        }

        tracing::debug!(param = %name, existing_routes = spliced, "Parameter validator registered");
        self.validators.push((name.to_string(), validator));
        Ok(())
    }

    /// Look up `path` among the routes registered for `method`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<Resolved<'_, H>> {
        let routes = self.methods.get(method)?;
        let mut params = Params::new();
        let &index = routes.tree.find(path, &mut params)?;
        Some(Resolved {
            route: &routes.routes[index],
            params,
        })
    }

    /// Methods under which `path` resolves, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self
            .methods
            .iter()
            .filter(|(_, routes)| routes.tree.find(path, &mut Params::new()).is_some())
            .map(|(method, _)| method.clone())
            .collect();
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        allowed
    }

    /// The tree for `method`, if any route was registered under it.
    pub fn tree(&self, method: &Method) -> Option<&Tree<usize>> {
        self.methods.get(method).map(|routes| &routes.tree)
    }

    /// All registered routes, grouped by method in no particular order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.methods.values().flat_map(|routes| routes.routes.iter())
    }

    /// Number of distinct (method, pattern) routes.
    pub fn len(&self) -> usize {
        self.methods.values().map(|routes| routes.routes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
