// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use httpmock::MockServer;
use portfolio_tracker::config::Config;
use portfolio_tracker::routes::create_router;
use portfolio_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Nothing listens here, so every upstream call fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Config with every upstream pointing at `coingecko` and `rpc`.
#[allow(dead_code)]
pub fn test_config(coingecko: &str, rpc: &str) -> Config {
    Config {
        coingecko_base_url: coingecko.to_string(),
        ethereum_rpc_url: rpc.to_string(),
        polygon_rpc_url: rpc.to_string(),
        bsc_rpc_url: rpc.to_string(),
        solana_rpc_url: rpc.to_string(),
        ..Config::default()
    }
}

fn app_for(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, reqwest::Client::new()));
    (create_router(state.clone()), state)
}

/// Create a test app whose upstreams are all unreachable.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    app_for(test_config(UNREACHABLE, UNREACHABLE))
}

/// Create a test app backed by mock CoinGecko and RPC servers.
#[allow(dead_code)]
pub fn create_mocked_app(coingecko: &MockServer, rpc: &MockServer) -> (Router, Arc<AppState>) {
    app_for(test_config(&coingecko.base_url(), &rpc.base_url()))
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
