// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod prices;
pub mod system;
pub mod wallets;

use crate::AppState;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{middleware, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Successful API payload: `success: true` plus the handler's fields.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
struct NotFoundResponse {
    success: bool,
    error: &'static str,
    path: String,
    method: String,
    suggestion: &'static str,
}

/// JSON 404 for anything no route or static file matched.
async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            error: "Not found",
            path: uri.path().to_string(),
            method: method.to_string(),
            suggestion: "Check /api/docs for available endpoints",
        }),
    )
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let wallet_routes = wallets::routes();

    let router = Router::new()
        .merge(system::routes())
        .nest("/api/wallets", wallet_routes.clone())
        // Deprecated alias kept for older frontends
        .nest("/api/wallet", wallet_routes)
        .nest("/api/prices", prices::routes());

    let router = match &state.config.static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static frontend");
            router.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .fallback(not_found.into_service()),
            )
        }
        None => router.fallback(not_found),
    };

    router
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
