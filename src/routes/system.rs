// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health, self-test and documentation endpoints.

use crate::chains::Chain;
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/test", get(api_test))
        .route("/api/test-apis", get(test_apis))
        .route("/api/docs", get(api_docs))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub build_id: String,
    pub timestamp: String,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_id,
        timestamp: now_rfc3339(),
    })
}

#[derive(Serialize)]
struct ApiTestResponse {
    message: &'static str,
    routes: BTreeMap<&'static str, &'static str>,
    timestamp: String,
}

async fn api_test() -> Json<ApiResponse<ApiTestResponse>> {
    ApiResponse::ok(ApiTestResponse {
        message: "API is working!",
        routes: BTreeMap::from([
            ("wallets", "/api/wallets"),
            ("walletsDeprecated", "/api/wallet"),
            ("prices", "/api/prices"),
        ]),
        timestamp: now_rfc3339(),
    })
}

#[derive(Serialize)]
struct UpstreamTestResponse {
    coingecko: String,
    rpc: BTreeMap<Chain, String>,
    timestamp: String,
}

/// Probe CoinGecko and every chain's RPC node.
async fn test_apis(State(state): State<Arc<AppState>>) -> Json<ApiResponse<UpstreamTestResponse>> {
    let coingecko = match state.prices.client().usd_price("ethereum").await {
        Ok(Some(price)) => format!("Working - ETH price: ${}", price),
        Ok(None) => "Error: no ETH price returned".to_string(),
        Err(e) => format!("Error: {}", e),
    };

    let probes = Chain::ALL.iter().map(|&chain| {
        let state = state.clone();
        async move {
            let status = match state.scanner.rpc(chain).probe().await {
                Ok(result) => format!("Working - {}", result),
                Err(e) => format!("Error: {}", e),
            };
            (chain, status)
        }
    });
    let rpc = join_all(probes).await.into_iter().collect();

    ApiResponse::ok(UpstreamTestResponse {
        coingecko,
        rpc,
        timestamp: now_rfc3339(),
    })
}

async fn api_docs() -> Json<Value> {
    Json(json!({
        "title": "Crypto Portfolio Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "wallet_routes": {
                "GET /api/wallets/{chain}/{address}": "Scan a wallet for native and known tokens",
                "GET /api/wallets/{chain}/{address}/summary": "Native balance only",
                "GET /api/wallets/{chain}/tokens/list": "Known tokens for a chain",
                "GET /api/wallets/{chain}/test/coingecko": "Test price lookups for a chain",
                "GET /api/wallets/{chain}/status": "Chain status",
                "POST /api/wallets/add": "Validate and scan a wallet",
                "DELETE /api/wallets/cache/clear": "Clear wallet price cache",
                "GET /api/wallets/cache/stats": "Wallet price cache statistics",
                "GET /api/wallets/status/all": "Status of every chain"
            },
            "price_routes": {
                "GET /api/prices/{symbols}": "Token prices (comma-separated)",
                "GET /api/prices/rates": "Cross-rates between USD, ETH, SOL and BTC",
                "GET /api/prices/realtime": "Prices for ?coins= in ?currencies=",
                "GET /api/prices/top10": "Top 10 coins by market cap",
                "GET /api/prices/ticker/data": "Ticker entries",
                "POST /api/prices/portfolio/calculate": "Value a list of wallets",
                "POST /api/prices/portfolio/convert": "Convert a value between currencies",
                "POST /api/prices/portfolio/goals": "Progress towards holding goals",
                "DELETE /api/prices/cache": "Clear price cache",
                "GET /api/prices/cache/stats": "Price cache statistics",
                "GET /api/prices/test/connectivity": "Test price API connectivity"
            },
            "system_routes": {
                "GET /api/test": "Basic API test",
                "GET /api/test-apis": "Test all external APIs",
                "GET /api/health": "Health check",
                "GET /api/docs": "This documentation"
            }
        },
        "supportedChains": Chain::ALL,
        "examples": {
            "wallet": "/api/wallets/ethereum/0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
            "prices": "/api/prices/eth,btc,sol",
            "realtime": "/api/prices/realtime?coins=btc,eth&currencies=usd,eur"
        }
    }))
}
