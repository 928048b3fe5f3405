//! Canned responses for configured routes.

use axum::http::{header, HeaderValue, StatusCode};
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::config::RouteConfig;
use crate::dispatch::{respond, Handler, HandlerResult, Next, RequestContext};
use crate::routing::Params;

/// Terminal handler answering with a fixed status and a body template.
///
/// `{name}` in the template is replaced by the captured parameter `name`;
/// unknown placeholders are left as they are.
#[derive(Debug, Clone)]
pub struct Responder {
    status: StatusCode,
    body: String,
    content_type: Option<HeaderValue>,
}

impl Responder {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Build from a validated route entry.
    pub fn from_config(route: &RouteConfig) -> Self {
        let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
        let responder = Self::new(status, route.body.clone());
        match HeaderValue::from_str(&route.content_type) {
            Ok(value) => responder.with_content_type(value),
            Err(_) => responder,
        }
    }

    /// Expand `{name}` placeholders from `params`.
    pub fn render(&self, params: &Params) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match params.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Handler for Responder {
    fn call(&self, cx: RequestContext, _next: Next) -> BoxFuture<'static, HandlerResult> {
        let body = self.render(cx.params());
        let result = match &self.content_type {
            Some(content_type) => respond((self.status, [(header::CONTENT_TYPE, content_type.clone())], body)),
            None => respond((self.status, body)),
        };
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        [("id", "42"), ("name", "ada")].into_iter().collect()
    }

    #[test]
    fn test_render_placeholders() {
        let responder = Responder::new(StatusCode::OK, "user {id} is {name}");
        assert_eq!(responder.render(&params()), "user 42 is ada");
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed() {
        let responder = Responder::new(StatusCode::OK, "{missing} and {id} and {open");
        assert_eq!(responder.render(&params()), "{missing} and 42 and {open");
    }

    #[test]
    fn test_from_config() {
        let route = RouteConfig {
            methods: vec!["GET".to_string()],
            pattern: "/x".to_string(),
            status: 201,
            body: "made".to_string(),
            content_type: "application/json".to_string(),
        };
        let responder = Responder::from_config(&route);

        assert_eq!(responder.status, StatusCode::CREATED);
        assert_eq!(responder.content_type, Some(HeaderValue::from_static("application/json")));
    }
}
