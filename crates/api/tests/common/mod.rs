#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use filmdb_api::config::ServerConfig;
use filmdb_api::router::build_app_router;
use filmdb_api::state::AppState;
use filmdb_events::LogNotifier;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 5,
        db_populate: false,
        request_timeout_secs: 30,
    }
}

/// Load the sample films and build the full application router on `pool`.
///
/// Uses the same middleware stack as `main.rs`; notifications go to the log.
pub async fn build_test_app(pool: PgPool) -> Router {
    filmdb_db::populate(&pool).await.unwrap();
    build_app_on(pool)
}

/// Build the router on an already populated `pool`, keeping its data.
pub fn build_app_on(pool: PgPool) -> Router {
    let state = AppState::new(pool, test_config(), Arc::new(LogNotifier));
    build_app_router(state)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// PUT with an optional `If-Match` header.
pub async fn put_json(
    app: Router,
    uri: &str,
    if_match: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::put(uri).header("content-type", "application/json");
    if let Some(tag) = if_match {
        builder = builder.header("if-match", tag);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
