// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health, docs, fallback and static frontend tests.

use axum::http::StatusCode;
use portfolio_tracker::config::Config;
use portfolio_tracker::routes::create_router;
use portfolio_tracker::AppState;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptimeSeconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_api_test_lists_route_prefixes() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/test")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["routes"]["prices"], "/api/prices");
}

#[tokio::test]
async fn test_docs_list_every_route_group() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/docs")).await;

    assert_eq!(status, StatusCode::OK);
    for group in ["wallet_routes", "price_routes", "system_routes"] {
        assert!(body["endpoints"][group].is_object(), "{}", group);
    }
    assert_eq!(body["supportedChains"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_upstream_self_test_reports_failures() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/test-apis")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["coingecko"].as_str().unwrap().starts_with("Error"));
    for chain in ["ethereum", "polygon", "bsc", "solana"] {
        assert!(body["rpc"][chain].as_str().unwrap().starts_with("Error"), "{}", chain);
    }
}

#[tokio::test]
async fn test_unknown_path_returns_json_404() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/nothing/here")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["path"], "/api/nothing/here");
    assert_eq!(body["method"], "GET");
    assert!(body["suggestion"].as_str().unwrap().contains("/api/docs"));
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(common::get("/api/health")).await.unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    let csp = response
        .headers()
        .get("Content-Security-Policy")
        .unwrap()
        .to_str()
        .unwrap();
    // Frontend imports web3 libraries from skypack and Chart.js from jsdelivr
    assert!(csp.contains("https://cdn.skypack.dev"));
    assert!(csp.contains("https://cdn.jsdelivr.net"));
}

#[tokio::test]
async fn test_static_frontend_with_json_fallback() {
    let dir = std::env::temp_dir().join(format!("portfolio-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Portfolio</h1>").unwrap();

    let config = Config {
        static_dir: Some(dir.clone()),
        ..common::test_config("http://127.0.0.1:9", "http://127.0.0.1:9")
    };
    let app = create_router(Arc::new(AppState::new(config, reqwest::Client::new())));

    let response = app.clone().oneshot(common::get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>Portfolio</h1>");

    let (status, body) = common::send(app, common::get("/missing.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/missing.js");

    std::fs::remove_dir_all(&dir).ok();
}
