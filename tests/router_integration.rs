//! In-process tests of the layered application.

use std::sync::Arc;

use axum::http::{header, Method, StatusCode};
use tower::ServiceExt;

use radix_router::dispatch::{respond, Failure, Flow, Next, RequestContext};
use radix_router::{HttpServer, Router, RouterConfig};

mod common;
use common::{body_string, request};

#[derive(Clone)]
struct User(&'static str);

fn app() -> axum::Router {
    HttpServer::from_config(common::sample_config()).unwrap().app()
}

#[tokio::test]
async fn test_configured_route_renders_params() {
    let response = app().oneshot(request(Method::GET, "/users/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_string(response).await, "user 42");
}

#[tokio::test]
async fn test_validator_rejects_bad_param() {
    let response = app().oneshot(request(Method::GET, "/users/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wildcard_capture_includes_leading_slash() {
    let response = app()
        .oneshot(request(Method::GET, "/static/css/site.css"))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "file /css/site.css");
}

#[tokio::test]
async fn test_method_policy() {
    let response = app().oneshot(request(Method::PUT, "/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "DELETE, GET, HEAD");

    let response = app().oneshot(request(Method::OPTIONS, "/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app().oneshot(request(Method::DELETE, "/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app().oneshot(request(Method::GET, "/nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_type_and_status_from_config() {
    let response = app().oneshot(request(Method::POST, "/echo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn test_body_limit() {
    let oversized = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/echo")
        .header(header::CONTENT_LENGTH, "64")
        .body(axum::body::Body::from(vec![b'x'; 64]))
        .unwrap();

    let response = app().oneshot(oversized).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_validators_share_state_with_handlers() {
    let mut router = Router::new();
    router
        .param("user", |mut cx: RequestContext, next: Next| async move {
            if cx.param("user") != Some("ada") {
                return Err(Failure::status(StatusCode::NOT_FOUND));
            }
            cx.extensions_mut().insert(User("Ada Lovelace"));
            next.run(cx).await
        })
        .unwrap()
        .get("/profile/:user", |cx: RequestContext, _next: Next| async move {
            let name = cx.extensions().get::<User>().map(|u| u.0).unwrap_or("?");
            respond(format!("{name} via {}", cx.route().unwrap_or("-")))
        })
        .unwrap();
    let app = HttpServer::new(router, RouterConfig::default()).app();

    let response = app.clone().oneshot(request(Method::GET, "/profile/ada")).await.unwrap();
    assert_eq!(body_string(response).await, "Ada Lovelace via /profile/:user");

    let response = app.oneshot(request(Method::GET, "/profile/bob")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_error_is_internal_server_error() {
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();

    let mut router = Router::new();
    router
        .get("/boom", |_cx: RequestContext, _next: Next| async move {
            Err::<Flow, _>(Failure::from_error("database unavailable"))
        })
        .unwrap()
        .get("/boom", move |_cx: RequestContext, _next: Next| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move { respond("unreachable") }
        })
        .unwrap();

    let response = router.into_axum().oneshot(request(Method::GET, "/boom")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unicode_capture_with_trailing_slash() {
    let mut router = Router::new();
    router
        .get("/search/:query", |cx: RequestContext, _next: Next| async move {
            respond(cx.param("query").unwrap_or_default().to_string())
        })
        .unwrap();

    let response = router
        .into_axum()
        .oneshot(request(Method::GET, "/search/someth!ng+in+%C3%BCn%C3%AC/"))
        .await
        .unwrap();

    assert_eq!(body_string(response).await, "someth!ng+in+ünì");
}
