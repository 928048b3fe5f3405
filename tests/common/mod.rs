//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request};
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use radix_router::config::RouterConfig;
use radix_router::{HttpServer, Shutdown};

/// Build a bodiless request.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as UTF-8.
#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Parse a configuration used by several tests.
#[allow(dead_code)]
pub fn sample_config() -> RouterConfig {
    radix_router::config::loader::from_str(
        r#"
        [listener]
        bind_address = "127.0.0.1:0"
        max_body_bytes = 16

        [[routes]]
        methods = ["GET"]
        pattern = "/users/:id"
        body = "user {id}"

        [[routes]]
        methods = ["DELETE"]
        pattern = "/users/:id"
        status = 204

        [[routes]]
        methods = ["GET"]
        pattern = "/static/*filepath"
        body = "file {filepath}"

        [[routes]]
        methods = ["POST"]
        pattern = "/echo"
        status = 201
        body = "created"
        content_type = "application/json"

        [[params]]
        name = "id"
        regex = "[0-9]+"
        "#,
    )
    .unwrap()
}

/// Serve `config` on an ephemeral port. Returns the bound address and the server task.
#[allow(dead_code)]
pub async fn spawn_server(config: RouterConfig, shutdown: &Shutdown) -> (SocketAddr, JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::from_config(config).unwrap();
    let shutdown = shutdown.clone();
    let handle = tokio::spawn(async move { server.run(listener, shutdown).await });
    (addr, handle)
}
